mod pii;

pub(crate) use pii::Pii;
