//! Archive format detection.
//!
//! Combines content sniffing with the file name guess. Content wins when
//! both name an archive format; a disagreement is only logged. Results are
//! cached per path for the lifetime of the [`Detector`].

use crate::mime::{
    encoding_for_mime, encoding_mime, format_for_mime, guess_from_name, is_archive_mime,
};
use oxiwrap_core::{Format, Memo, MimeSniffer, Result, WrapError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A detected archive: container format plus optional compression.
pub type Detected = (Format, Option<Format>);

/// Answers of an uncompress attempt that carry no information.
const UNINFORMATIVE: &[&str] = &[
    "application/x-empty",
    "inode/x-empty",
    "application/octet-stream",
];

/// Detects the format and compression of archive files.
pub struct Detector {
    sniffer: Arc<dyn MimeSniffer>,
    cache: Memo<PathBuf, Detected>,
}

impl Detector {
    /// Create a detector using the given content sniffer.
    pub fn new(sniffer: Arc<dyn MimeSniffer>) -> Self {
        Self {
            sniffer,
            cache: Memo::new(),
        }
    }

    /// The per-path result cache.
    pub fn cache(&self) -> &Memo<PathBuf, Detected> {
        &self.cache
    }

    /// Detect the format of an existing file from its content and name.
    pub fn detect(&self, path: &Path) -> Result<Detected> {
        let key = path.to_path_buf();
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let (mime, encoding) = self.guess_mime(path)?;
        let detected = to_formats(path, mime, encoding)?;
        debug!(path = %path.display(), format = %detected.0, compression = ?detected.1, "detected");
        self.cache.seed(key, detected);
        Ok(detected)
    }

    /// Detect the format of a file from its name only.
    ///
    /// Used for archives that do not exist yet.
    pub fn detect_by_name(&self, path: &Path) -> Result<Detected> {
        let guess = guess_from_name(path);
        let encoding = guess.encoding.and_then(encoding_mime).map(str::to_string);
        to_formats(path, guess.mime, encoding)
    }

    fn guess_mime(&self, path: &Path) -> Result<(Option<String>, Option<String>)> {
        let sniffed = self.sniffer.sniff(path)?;
        let mut mime = sniffed.mime;
        let mut encoding = None;

        if let Some(outer) = mime.clone().filter(|m| encoding_for_mime(m).is_some()) {
            let inner = self.sniffer.sniff_uncompressed(path)?;
            match inner.mime.as_deref() {
                Some(m) if is_archive_mime(m) && encoding_for_mime(m).is_none() => {
                    mime = Some(m.to_string());
                    encoding = Some(inner.encoding.unwrap_or_else(|| outer.clone()));
                }
                Some(m) if !UNINFORMATIVE.contains(&m) && encoding_for_mime(m).is_none() => {
                    // Plain data inside the wrapper: the file is the encoding itself.
                }
                _ => {
                    let guess = guess_from_name(path);
                    if guess.encoding.is_some() && guess.mime.as_deref().is_some_and(is_archive_mime)
                    {
                        debug!(path = %path.display(), "inner content unknown, using file name");
                        mime = guess.mime;
                        encoding = Some(outer);
                    }
                }
            }
        }

        let guess = guess_from_name(path);
        match mime.as_deref() {
            Some(m) if is_archive_mime(m) => {
                let guessed = guess.mime.as_deref().and_then(format_for_mime);
                if guessed != format_for_mime(m) {
                    info!(
                        path = %path.display(),
                        content = m,
                        extension = guess.mime.as_deref().unwrap_or("unknown"),
                        "file content differs from its extension, using content"
                    );
                }
                Ok((mime, encoding))
            }
            _ if guess.mime.as_deref().is_some_and(is_archive_mime) => Ok((
                guess.mime,
                guess
                    .encoding
                    .and_then(encoding_mime)
                    .map(str::to_string),
            )),
            _ => Err(WrapError::unknown_format(path, mime.or(guess.mime))),
        }
    }
}

fn to_formats(path: &Path, mime: Option<String>, encoding: Option<String>) -> Result<Detected> {
    let Some(format) = mime.as_deref().and_then(format_for_mime) else {
        return Err(WrapError::unknown_format(path, mime));
    };
    let compression = match encoding.as_deref() {
        None => None,
        Some(enc) => match encoding_for_mime(enc) {
            Some(compression) => Some(compression),
            None => return Err(WrapError::unknown_format(path, encoding)),
        },
    };
    if compression == Some(format) {
        return Ok((format, None));
    }
    Ok((format, compression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxiwrap_core::Sniffed;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSniffer {
        outer: Sniffed,
        inner: Sniffed,
        calls: AtomicUsize,
    }

    impl CountingSniffer {
        fn new(outer: Sniffed, inner: Sniffed) -> Arc<Self> {
            Arc::new(Self {
                outer,
                inner,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl MimeSniffer for CountingSniffer {
        fn sniff(&self, _path: &Path) -> Result<Sniffed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outer.clone())
        }

        fn sniff_uncompressed(&self, _path: &Path) -> Result<Sniffed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.inner.clone())
        }
    }

    #[test]
    fn test_tar_inside_gzip() {
        let sniffer = CountingSniffer::new(
            Sniffed::mime("application/gzip"),
            Sniffed::wrapped("application/x-tar", "application/gzip"),
        );
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("report.tar.gz")).unwrap(),
            (Format::Tar, Some(Format::Gzip))
        );
    }

    #[test]
    fn test_content_wins_over_extension() {
        let sniffer = CountingSniffer::new(Sniffed::mime("application/zip"), Sniffed::default());
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("data.zip.bak")).unwrap(),
            (Format::Zip, None)
        );
        let sniffer = CountingSniffer::new(Sniffed::mime("application/zip"), Sniffed::default());
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("photos.rar")).unwrap(),
            (Format::Zip, None)
        );
    }

    #[test]
    fn test_content_mismatch_is_logged() {
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct InfoEvents(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> Layer<S> for InfoEvents {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == tracing::Level::INFO {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let info_events = |name: &str| {
            let count = Arc::new(AtomicUsize::new(0));
            let subscriber = tracing_subscriber::registry().with(InfoEvents(count.clone()));
            let sniffer =
                CountingSniffer::new(Sniffed::mime("application/zip"), Sniffed::default());
            let detected = tracing::subscriber::with_default(subscriber, || {
                Detector::new(sniffer).detect(Path::new(name)).unwrap()
            });
            assert_eq!(detected, (Format::Zip, None));
            count.load(Ordering::SeqCst)
        };

        assert_eq!(info_events("data.zip.bak"), 1);
        assert_eq!(info_events("photos.rar"), 1);
        assert_eq!(info_events("photos.zip"), 0);
    }

    #[test]
    fn test_detection_is_cached() {
        let sniffer = CountingSniffer::new(
            Sniffed::mime("application/gzip"),
            Sniffed::wrapped("application/x-tar", "application/gzip"),
        );
        let detector = Detector::new(sniffer.clone());
        let first = detector.detect(Path::new("a.tgz")).unwrap();
        let calls = sniffer.calls.load(Ordering::SeqCst);
        let second = detector.detect(Path::new("a.tgz")).unwrap();
        assert_eq!(first, second);
        assert_eq!(sniffer.calls.load(Ordering::SeqCst), calls);
        assert_eq!(detector.cache().len(), 1);
    }

    #[test]
    fn test_bare_encoding() {
        let sniffer = CountingSniffer::new(
            Sniffed::mime("application/gzip"),
            Sniffed::wrapped("text/plain", "application/gzip"),
        );
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("notes.txt.gz")).unwrap(),
            (Format::Gzip, None)
        );
    }

    #[test]
    fn test_failed_uncompress_uses_name() {
        let sniffer = CountingSniffer::new(
            Sniffed::mime("application/x-bzip2"),
            Sniffed::mime("application/x-empty"),
        );
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("src.tar.bz2")).unwrap(),
            (Format::Tar, Some(Format::Bzip2))
        );
    }

    #[test]
    fn test_octet_stream_falls_back_to_name() {
        let sniffer = CountingSniffer::new(
            Sniffed::mime("application/octet-stream"),
            Sniffed::default(),
        );
        let detector = Detector::new(sniffer);
        assert_eq!(
            detector.detect(Path::new("disk.iso")).unwrap(),
            (Format::Iso, None)
        );
    }

    #[test]
    fn test_unknown_format_reports_mime() {
        let sniffer = CountingSniffer::new(Sniffed::mime("text/plain"), Sniffed::default());
        let detector = Detector::new(sniffer);
        let err = detector.detect(Path::new("notes")).unwrap_err();
        assert!(matches!(
            err,
            WrapError::UnknownFormat { mime: Some(ref m), .. } if m == "text/plain"
        ));
    }

    #[test]
    fn test_detect_by_name() {
        let sniffer = CountingSniffer::new(Sniffed::default(), Sniffed::default());
        let detector = Detector::new(sniffer.clone());
        assert_eq!(
            detector.detect_by_name(Path::new("out.tar.xz")).unwrap(),
            (Format::Tar, Some(Format::Xz))
        );
        assert_eq!(
            detector.detect_by_name(Path::new("out.gz")).unwrap(),
            (Format::Gzip, None)
        );
        assert!(detector.detect_by_name(Path::new("out.txt")).is_err());
        assert_eq!(sniffer.calls.load(Ordering::SeqCst), 0);
    }
}
