//! Reports how close the training set is to the minimum image counts.

use filmgrain::dataset::inventory;
use filmgrain::logging;

fn main() {
    logging::init();
    let report = inventory::readiness();
    inventory::print_report(&report);
}
