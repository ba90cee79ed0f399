use std::{
    fs::{self, File},
    io,
    path::Path,
    sync::{mpsc, LazyLock, Mutex},
};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::Log;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Where formatted log lines go besides the log file, if a frontend asked for them.
static LOG_SINK: LazyLock<Mutex<Option<mpsc::Sender<String>>>> =
    LazyLock::new(|| Mutex::new(None));

pub struct MainLogger {
    write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
}

impl MainLogger {
    fn new(write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>) -> Self {
        Self { write_logger }
    }
}

impl Log for MainLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.write_logger.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_logger.log(record);

        let message = format!(
            "{}:{} -- {}",
            record.level(),
            record.target(),
            record.args()
        );

        let mut sink = LOG_SINK.lock().unwrap();
        let delivered = match sink.as_ref() {
            Some(tx) => tx.send(message.clone()).is_ok(),
            None => false,
        };
        if !delivered {
            // nobody is listening (anymore)
            *sink = None;
            eprintln!("{message}");
        }
    }

    fn flush(&self) {
        self.write_logger.flush();
    }
}

pub fn init(log_dir: &Path) -> Result<()> {
    let folder = log_dir.join("logs");
    fs::create_dir_all(&folder)?;
    let log = FileRotate::new(
        folder.join("main.log"),
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let write_logger = WriteLogger::new(LevelFilter::Info, config, log);
    let main_logger = MainLogger::new(write_logger);
    match log::set_boxed_logger(Box::new(main_logger)) {
        Ok(()) => log::set_max_level(LevelFilter::Info),
        // The first logger keeps writing to the folder it was created with.
        Err(_) => warn!("logger is already initialized"),
    }
    Ok(())
}

/// Routes log lines to the returned receiver from now on, replacing any
/// previous subscriber.
pub fn subscribe() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    *LOG_SINK.lock().unwrap() = Some(tx);
    rx
}

/// Bundles every file of the log folder into a zip at `target_file_path`.
pub fn export(log_dir: &Path, target_file_path: &Path) -> Result<()> {
    let mut zip = zip::ZipWriter::new(File::create(target_file_path)?);
    let default_options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let log_folder = log_dir.join("logs/");
    for entry in (fs::read_dir(&log_folder)?).flatten() {
        let path = entry.path();
        if path.is_file() {
            if let Some(name) = path.strip_prefix(log_dir)?.to_str() {
                zip.start_file(name, default_options)?;
                let mut log_file = File::open(&path)?;
                io::copy(&mut log_file, &mut zip)?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}
