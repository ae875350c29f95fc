//! The build-selected catalog is reported through `tracing`.

use std::io;
use std::sync::{Arc, Mutex};

use fixsimd::{native_catalog_info, ChunkCatalog, ChunkKind, NativeCatalog};

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(level: tracing::Level) -> (CapturedLog, impl tracing::Subscriber + Send + Sync) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(level)
        .finish();
    (log, subscriber)
}

// One test so that no other subscriber is live while the callsite interest is
// computed.
#[test]
fn test_native_catalog_is_logged_at_info_only() {
    type F32x13 = fixsimd::FixedSizeSimd<f32, 13>;

    let (quiet, subscriber) = capture(tracing::Level::WARN);
    tracing::subscriber::with_default(subscriber, || {
        assert_eq!(F32x13::splat(1.0).sum(), 13.0);
        native_catalog_info();
    });
    assert!(quiet.contents().is_empty());

    let (log, subscriber) = capture(tracing::Level::INFO);
    let info = tracing::subscriber::with_default(subscriber, native_catalog_info);

    let output = log.contents();
    assert_eq!(output.lines().count(), 1, "{output}");
    assert!(output.contains("chunk catalog"), "{output}");
    assert!(output.contains(info.name), "{output}");
    assert!(output.contains(&format!("max_register_bytes={}", info.max_register_bytes)));

    assert_eq!(info.name, NativeCatalog::NAME);
    assert!(info.kinds.contains(ChunkKind::Scalar));
    assert_eq!(info.max_register_bytes * 8, info.kinds.widest().bits());
}
