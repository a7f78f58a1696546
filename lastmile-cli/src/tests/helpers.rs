//! Test helpers for writing dispatch requests and order exports to disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Three pending orders east and west of the origin; the best open route
/// from the origin visits them as 3, 1, 2.
pub(super) const DETOUR_ORDERS: &str = r#"[
    {"id": 1, "status": "pending", "delivery_location": {"lat": 0.0, "lng": 1.0}},
    {"id": 2, "status": "pending", "delivery_location": {"lat": 0.0, "lng": 2.0}},
    {"id": 3, "status": "pending", "delivery_location": {"lat": 0.0, "lng": -1.0}}
]"#;

/// Dispatch request for orders 1, 2 and 3 starting at the origin.
pub(super) const DETOUR_REQUEST: &str = r#"{
    "orderIds": [1, 2, 3],
    "driverId": 7,
    "startLocation": {"lat": 0.0, "lng": 0.0}
}"#;

/// Temporary directory holding the files one invocation reads.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}
