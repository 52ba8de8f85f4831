// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use std::{
    env,
    ffi::OsStr,
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

const FALLBACK_LOG_NAME: &str = "airgap";

/// How a log directory is rotated.
#[derive(Debug, Clone, Copy)]
pub(super) struct Rotation {
    /// Size a log file may reach before it is rotated.
    pub(super) max_bytes: usize,
    /// Rotated files kept as they are. Anything older is compressed.
    pub(super) uncompressed_files: usize,
    /// Files kept in total. Older ones are deleted.
    pub(super) max_files: usize,
}

/// Non-blocking writer into `<dir>/<binary name>.log`, rotated per `rotation`.
///
/// The guard flushes outstanding lines when dropped and must outlive all logging.
pub(super) fn file_rotater(dir: &Path, rotation: Rotation) -> (NonBlocking, WorkerGuard) {
    let file_appender = RotatingFile::new(
        dir.join(log_file_name()),
        AppendTimestamp::default(FileLimit::MaxFiles(rotation.max_files)),
        ContentLimit::BytesSurpassed(rotation.max_bytes),
        Compression::OnRotate(rotation.uncompressed_files),
    );

    // block on a full buffer rather than drop lines
    NonBlockingBuilder::default()
        .lossy(false)
        .finish(file_appender)
}

fn log_file_name() -> String {
    let binary_name = env::current_exe()
        .map(|path| {
            path.file_stem()
                .unwrap_or(OsStr::new(FALLBACK_LOG_NAME))
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|_| FALLBACK_LOG_NAME.to_string());
    format!("{binary_name}.log")
}

/// `std::io::Write` over a [`FileRotate`], so it can back a `tracing_appender` worker.
///
/// The newest file always keeps the plain name, so `tail -f` keeps working across rotations.
struct RotatingFile {
    writer: FileRotate<AppendTimestamp>,
}

impl RotatingFile {
    fn new(
        path: PathBuf,
        suffix: AppendTimestamp,
        content_limit: ContentLimit,
        compression: Compression,
    ) -> Self {
        let writer = FileRotate::new(
            path,
            suffix,
            content_limit,
            compression,
            #[cfg(unix)]
            None,
        );
        Self { writer }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFile").finish()
    }
}
