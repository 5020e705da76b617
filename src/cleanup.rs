use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

/// Temporary files the process may leave behind, in registration order.
/// Swept on every exit path: normal, error, or interrupt.
static REGISTRY: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// Marks a file for removal at exit.
pub fn register(path: &Path) {
    if let Ok(mut reg) = REGISTRY.lock() {
        if !reg.iter().any(|p| p == path) {
            reg.push(path.to_path_buf());
        }
    }
}

/// Takes a file back off the removal list, e.g. a log being preserved
/// after a failed build.
pub fn unregister(path: &Path) {
    if let Ok(mut reg) = REGISTRY.lock() {
        reg.retain(|p| p != path);
    }
}

/// Removes every registered file. Missing files are not an error and a
/// second sweep is a no-op.
pub fn remove_all() {
    if let Ok(mut reg) = REGISTRY.lock() {
        for path in reg.drain(..) {
            let _ = fs::remove_file(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One sequential test: the registry is process-global and parallel
    // sweeps would race each other.
    #[test]
    fn sweep_removes_registered_files_and_spares_unregistered() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.log");
        let gone_a = dir.path().join("a.tmp");
        let gone_b = dir.path().join("b.tmp");

        for path in [&keep, &gone_a, &gone_b] {
            fs::write(path, "x").unwrap();
            register(path);
        }
        // Double registration must not cause a double remove attempt.
        register(&gone_a);
        unregister(&keep);

        remove_all();
        assert!(keep.exists());
        assert!(!gone_a.exists());
        assert!(!gone_b.exists());

        remove_all();
        assert!(keep.exists());
    }
}
