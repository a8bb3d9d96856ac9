//! Reusable record and collection fixtures.
//!
//! - [`scan`] builds a named [`Record`] with detectors and samples.
//! - [`flagged_scan`] adds a "valid" interval list.
//! - [`collection`] fills a [`Data`] with one scan per name.

use swath_comm::Comm;
use swath_data::{Data, Record};
use swath_intervals::IntervalList;

use crate::ramp;

/// A record named `name` with uid `uid`, detectors `d0..d{n_dets}` and
/// `n_samples` samples at 1 Hz.
pub fn scan(name: &str, uid: u64, n_dets: usize, n_samples: usize) -> Record {
    Record::new()
        .with_name(name)
        .with_uid(uid)
        .with_detectors((0..n_dets).map(|d| format!("d{d}")))
        .with_timestamps(ramp(n_samples))
}

/// [`scan`] with a "valid" interval list over the given sample spans.
pub fn flagged_scan(name: &str, uid: u64, n_samples: usize, valid: &[(usize, usize)]) -> Record {
    let mut rec = scan(name, uid, 2, n_samples);
    let ts = rec.timestamps().cloned().expect("scan always has timestamps");
    let list = IntervalList::from_samplespans(ts, valid).expect("valid spans must fit the scan");
    rec.set_intervals("valid", list)
        .expect("list is built on the record's own timestamps");
    rec
}

/// An owning collection over `comm` with one scan per name. Uids are the
/// positions.
pub fn collection(comm: Comm, names: &[&str]) -> Data {
    let mut data = Data::new(comm);
    for (i, name) in names.iter().enumerate() {
        data.push(scan(name, i as u64, 2, 10));
    }
    data
}
