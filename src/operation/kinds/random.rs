use crate::value::{Resolved, Scalar};
use rand::Rng;

pub(crate) fn uniform() -> Resolved {
    Resolved::Single(Scalar::from(rand::rng().random::<f64>()))
}
