pub(super) mod form;
pub(super) mod navigation;
