use std::sync::Mutex;

use super::*;
use crate::foundation::error::ErrorKind;

struct FakeAcquirer {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl FakeAcquirer {
    fn new(fail_on: Option<&'static str>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on,
        }
    }
}

impl Acquire for FakeAcquirer {
    fn resolve(&self, name: &str, source_ref: &str) -> ReelResult<ResolvedMedia> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.fail_on == Some(name) {
            return Err(ReelError::validation("probe said no"));
        }
        Ok(ResolvedMedia {
            name: name.to_string(),
            path: PathBuf::from(source_ref),
            duration_sec: 100.0,
            dimensions: Some((64, 64)),
            owned: true,
        })
    }
}

fn req(name: &str) -> SongRequest {
    SongRequest {
        display_name: name.to_string(),
        source_ref: format!("{name}.mp4"),
        start_sec: 0.0,
        end_sec: 10.0,
        is_mirrored: true,
    }
}

#[test]
fn keeps_input_order_across_workers() {
    let acq = FakeAcquirer::new(None);
    let reqs: Vec<_> = (0..8).map(|i| req(&format!("s{i}"))).collect();
    let out = resolve_songs(&acq, &reqs, 4).unwrap();
    let names: Vec<_> = out.iter().map(|s| s.media.name.as_str()).collect();
    assert_eq!(names, ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
    for song in &out {
        assert_eq!(song.request.display_name, song.media.name);
    }
}

#[test]
fn repeated_names_are_fetched_once() {
    let acq = FakeAcquirer::new(None);
    let reqs = vec![req("a"), req("b"), req("a")];
    let out = resolve_songs(&acq, &reqs, 2).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].media.name, "a");
    let mut calls = acq.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(calls, ["a", "b"]);
}

#[test]
fn failure_is_wrapped_as_acquisition_with_name() {
    let acq = FakeAcquirer::new(Some("b"));
    let err = resolve_songs(&acq, &[req("a"), req("b")], 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AcquisitionPropagated);
    assert_eq!(err.request_name(), Some("b"));
    assert!(err.to_string().contains("probe said no"));
}

#[test]
fn zero_jobs_is_rejected() {
    let acq = FakeAcquirer::new(None);
    assert!(resolve_songs(&acq, &[req("a")], 0).is_err());
}
