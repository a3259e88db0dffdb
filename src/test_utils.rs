/*
 * Test utilities and helpers for tpmpoll
 *
 * Fake sysfs attributes on disk and in-memory reporters shared by the
 * unit tests of several modules.
 */

#[cfg(test)]
pub mod test_utils {
    use crate::attribute::AttributeDescriptor;
    use crate::monitor::Monitor;
    use crate::report::Reporter;
    use crate::source::SampleSource;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Reporter writing both sinks to memory.
    pub fn memory_reporter(attribute: &AttributeDescriptor) -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(
            Vec::new(),
            Vec::new(),
            PathBuf::from(attribute.log_path),
            attribute.width,
        )
    }

    pub fn log_text<S: SampleSource>(monitor: &Monitor<S, Vec<u8>, Vec<u8>>) -> String {
        String::from_utf8_lossy(monitor.reporter().log()).into_owned()
    }

    /// A temp dir holding a fake attribute file and room for a log file.
    pub struct FakeSysfs {
        pub dir: TempDir,
        pub source: PathBuf,
        pub log: PathBuf,
    }

    impl FakeSysfs {
        pub fn with_content(content: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let source = dir.path().join("attribute");
            let log = dir.path().join("log.txt");
            fs::write(&source, content).unwrap();
            Self { dir, source, log }
        }

        pub fn missing() -> Self {
            let dir = TempDir::new().unwrap();
            let source = dir.path().join("absent");
            let log = dir.path().join("log.txt");
            Self { dir, source, log }
        }

        pub fn log_contents(&self) -> Option<String> {
            fs::read_to_string(&self.log).ok()
        }
    }
}
