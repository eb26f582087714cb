/// Plain SGD with a mutable learning rate.
///
/// The rate is mutable because the plateau scheduler in the fit loop halves
/// it mid-run (floored at `TrainConfig::min_lr`).
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}
