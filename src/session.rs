use crate::{
    collect::{OutputFile, collect_outputs},
    command::{self, CommandSpec, escape_path},
    config::Config,
    engine::{ProcessRunner, RunOutput, Runner, parse_errors},
    error::{Error, ErrorKind, Result, Warning, WarningObserver},
    format::{DataOutput, OutputFormat, OutputRequest},
    image_source::ImageInput,
    lang::LangToken,
    locate::{self, DATA_DIR_ENV},
    normalize::{self, Record},
    util::{self, TEMP_PREFIX},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Per-call recognition options.
#[derive(Debug, Clone, Default)]
pub struct Recognize {
    pub formats: OutputRequest,
    pub lang: Vec<LangToken>,
    /// Extra engine arguments, e.g. `"--psm 6 --tessdata-dir /data"`.
    pub extra_args: Option<String>,
    /// Where the engine writes `{base}.{ext}`; a fresh temp name when unset.
    pub output_base: Option<PathBuf>,
}

impl Recognize {
    pub fn new(formats: impl Into<OutputRequest>) -> Self {
        Self {
            formats: formats.into(),
            ..Default::default()
        }
    }

    pub fn lang<T: Into<LangToken>>(mut self, langs: impl IntoIterator<Item = T>) -> Self {
        self.lang = langs.into_iter().map(Into::into).collect();
        self
    }

    pub fn extra_args(mut self, args: impl Into<String>) -> Self {
        self.extra_args = Some(args.into());
        self
    }

    pub fn output_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.output_base = Some(base.into());
        self
    }
}

/// One decoded output file; `record` is `None` when the file could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedData {
    pub format: OutputFormat,
    pub record: Option<Record>,
}

/// Orchestration context: configuration, engine runner and temp-file bookkeeping.
///
/// One session serves one logical caller; separate sessions share nothing.
pub struct Session<R: Runner = ProcessRunner> {
    cfg: Config,
    runner: R,
    temp_files: Vec<PathBuf>,
    observer: Option<WarningObserver>,
    markup_warned: bool,
}

impl Session<ProcessRunner> {
    pub fn new(cfg: &Config) -> Self {
        Self::with_runner(cfg, ProcessRunner)
    }
}

impl<R: Runner> Session<R> {
    pub fn with_runner(cfg: &Config, runner: R) -> Self {
        Self {
            cfg: cfg.clone(),
            runner,
            temp_files: Vec::new(),
            observer: None,
            markup_warned: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Receives every warning this session emits, in addition to `tracing`.
    pub fn set_observer(&mut self, observer: impl Fn(&Warning) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    fn warn(&self, warning: Warning) {
        warn!(kind = ?warning.kind, "{}", warning.message);
        if let Some(observer) = &self.observer {
            observer(&warning);
        }
    }

    fn report(&self, err: Error) -> Error {
        self.warn(Warning::from(&err));
        err
    }

    pub fn command(&self) -> &str {
        &self.cfg.engine.command
    }

    pub fn set_command(&mut self, cmd: &str, check_runnable: bool, write_cache: bool) -> Result<()> {
        let cmd = cmd.trim();
        if cmd.is_empty() {
            return Err(self.report(Error::InvalidCommand(cmd.to_string())));
        }
        self.cfg.engine.command = cmd.to_string();

        if check_runnable && !self.runnable() {
            self.warn(Warning::new(
                ErrorKind::Config,
                format!("set_command: the given command ({cmd}) is not runnable"),
            ));
        }
        if write_cache {
            if let Err(err) = util::write_file(&self.cache_file(), cmd) {
                self.report(err);
            }
        }
        Ok(())
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.cfg.engine.data_dir.as_deref()
    }

    pub fn set_data_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(self.report(Error::InvalidDataDir(dir.to_path_buf())));
        }
        self.cfg.engine.data_dir = Some(dir.to_path_buf());
        Ok(())
    }

    pub fn content_sep(&self) -> &str {
        &self.cfg.engine.content_sep
    }

    pub fn set_content_sep(&mut self, sep: &str) -> Result<()> {
        if sep.is_empty() {
            return Err(self.report(Error::InvalidSeparator(sep.to_string())));
        }
        self.cfg.engine.content_sep = sep.to_string();
        Ok(())
    }

    pub fn temp_dir(&self) -> PathBuf {
        util::temp_dir(&self.cfg.paths)
    }

    /// Files created by this session and not yet cleaned up.
    pub fn temp_files(&self) -> &[PathBuf] {
        &self.temp_files
    }

    fn cache_file(&self) -> PathBuf {
        self.temp_dir().join(&self.cfg.engine.path_cache_file)
    }

    /// Falls back to the cached binary path when the configured command does not run,
    /// then picks up a data directory if one can be found.
    pub fn init(&mut self) {
        // Setter failures are already reported; init keeps the previous values.
        if !self.runnable() {
            if let Some(found) = self.locate() {
                let found = found.to_string_lossy().into_owned();
                if self.set_command(&found, true, false).is_err() {
                    debug!("init: keeping command {}", self.command());
                }
            }
        }
        if let Some(dir) = self.locate_data() {
            if self.set_data_dir(&dir).is_err() {
                debug!("init: ignoring data dir {}", dir.display());
            }
        }
    }

    pub fn locate(&self) -> Option<PathBuf> {
        locate::cached_command(&self.cache_file())
    }

    pub fn locate_data(&self) -> Option<PathBuf> {
        locate::data_dir_for(self.command())
    }

    /// Removes the binary path cache file. `Ok(false)` if there was none.
    pub fn clear_cache(&self) -> Result<bool> {
        let path = self.cache_file();
        if !path.is_file() {
            return Ok(false);
        }
        util::remove_file(&path).map_err(|e| self.report(e))?;
        Ok(true)
    }

    fn data_dir_env(&self) -> Option<String> {
        self.data_dir().map(|d| d.to_string_lossy().into_owned())
    }

    /// Runs a raw command line, or the bare engine command when `None`.
    pub fn run(&self, command_line: Option<&str>, silent: bool) -> RunOutput {
        let line = match command_line {
            Some(line) => line.to_string(),
            None => match escape_path(self.command()) {
                Ok(line) => line,
                Err(err) => {
                    if !silent {
                        self.warn(Warning::from(&err));
                    }
                    return RunOutput::failed(err);
                }
            },
        };
        let data_dir = self.data_dir_env();
        let env: Vec<(&str, &str)> = data_dir.iter().map(|d| (DATA_DIR_ENV, d.as_str())).collect();

        let out = self.runner.run(&line, &env);
        if !silent {
            if let Some(err) = &out.error {
                self.warn(Warning::from(err));
            }
        }
        out
    }

    pub fn tesseract_version(&self) -> Option<String> {
        let line = format!("{} --version", escape_path(self.command()).ok()?);
        let out = self.run(Some(&line), true);
        if !out.success() {
            return None;
        }
        locate::parse_version(&out.stdout).or_else(|| locate::parse_version(&out.stderr))
    }

    pub fn runnable(&self) -> bool {
        self.tesseract_version().is_some()
    }

    /// `remove_all` deletes every `TESS_*` file in the temp dir; otherwise only the
    /// files tracked by this session. Returns how many files were deleted.
    pub fn clear_temp(&mut self, remove_all: bool) -> usize {
        let mut targets = std::mem::take(&mut self.temp_files);
        if remove_all {
            let dir = self.temp_dir();
            match std::fs::read_dir(&dir) {
                Ok(entries) => targets.extend(
                    entries
                        .filter_map(|e| e.ok())
                        .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
                        .map(|e| e.path()),
                ),
                Err(e) => {
                    self.report(Error::io("list", dir, e));
                }
            }
            targets.sort();
            targets.dedup();
        }
        self.remove_all(targets)
    }

    fn cleanup_since(&mut self, mark: usize) -> usize {
        let mark = mark.min(self.temp_files.len());
        let created: Vec<PathBuf> = self.temp_files.drain(mark..).collect();
        self.remove_all(created)
    }

    fn remove_all(&self, paths: Vec<PathBuf>) -> usize {
        let mut removed = 0;
        for path in paths {
            if !path.is_file() {
                continue;
            }
            match util::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) => {
                    self.report(err);
                }
            }
        }
        removed
    }

    fn track(&mut self, path: PathBuf) {
        if path.starts_with(self.temp_dir()) {
            self.temp_files.push(path);
        }
    }

    // Token-based, so `--tessdata-dir` only counts as an actual flag; falls back to a
    // substring search when the arguments don't tokenize.
    fn has_data_dir_hint(&self, extra_args: Option<&str>) -> bool {
        if self.data_dir().is_some() || std::env::var_os(DATA_DIR_ENV).is_some() {
            return true;
        }
        let Some(extra) = extra_args else {
            return false;
        };
        match command::split_extra_args(extra) {
            Ok(tokens) => tokens
                .iter()
                .any(|t| t == "--tessdata-dir" || t.starts_with("--tessdata-dir=")),
            Err(_) => extra.contains("--tessdata-dir"),
        }
    }

    /// Runs the engine and returns the output files that exist, in request order.
    pub fn image_to_file(&mut self, image: ImageInput<'_>, opts: &Recognize) -> Result<Vec<OutputFile>> {
        if !self.has_data_dir_hint(opts.extra_args.as_deref()) {
            self.warn(Warning::new(
                ErrorKind::Config,
                format!(
                    "image_to_file: the data directory hasn't been specified, the command may fail; \
                     set engine.data_dir, pass '--tessdata-dir <PATH>' as an extra argument \
                     or export {DATA_DIR_ENV}"
                ),
            ));
        }

        let temp_dir = self.temp_dir();
        let in_file = util::new_temp_file(&temp_dir).map_err(|e| self.report(e))?;
        self.track(in_file.clone());
        let output_base = match &opts.output_base {
            Some(base) => base.clone(),
            None => util::new_temp_name(&temp_dir).map_err(|e| self.report(e))?,
        };

        match image {
            ImageInput::Path(src) => {
                std::fs::copy(src, &in_file)
                    .map_err(|e| self.report(Error::io("copy", src, e)))?;
            }
            ImageInput::Bitmap(source) => {
                debug!("saving {} bitmap to {}", source.library(), in_file.display());
                source.save_bitmap(&in_file).map_err(|e| self.report(e))?;
            }
        }

        let built = command::build(&CommandSpec {
            command: self.command(),
            input: &in_file,
            output_base: &output_base,
            request: &opts.formats,
            lang: &opts.lang,
            extra: opts.extra_args.as_deref(),
        })
        .map_err(|e| self.report(e))?;
        for w in &built.warnings {
            self.warn(Warning::new(
                w.kind(),
                format!("{w}; extra arguments will be ignored"),
            ));
        }

        let line = built.command_line().map_err(|e| self.report(e))?;
        debug!("command built: {line}");
        let mut out = self.run(Some(&line), true);
        if let Some(err) = out.error.take() {
            return Err(self.report(err));
        }
        if !out.success() {
            return Err(self.report(Error::Engine {
                status: out.status,
                message: parse_errors(&out.stderr),
            }));
        }

        let files = collect_outputs(&output_base, &opts.formats);
        info!(
            "engine produced {} of {} requested outputs",
            files.len(),
            opts.formats.len()
        );
        for f in &files {
            self.track(f.path.clone());
        }
        Ok(files)
    }

    /// Recognizes into temp files, decodes each one, then deletes what this call created.
    pub fn image_to_data(
        &mut self,
        image: ImageInput<'_>,
        opts: &Recognize,
        mode: DataOutput,
    ) -> Result<Vec<ExtractedData>> {
        self.reject_pdf(opts, "image_to_data")?;

        let opts = Recognize {
            output_base: None,
            ..opts.clone()
        };
        let mark = self.temp_files.len();
        let result = self
            .image_to_file(image, &opts)
            .map(|files| files.iter().map(|f| self.decode(f, mode)).collect());
        self.cleanup_since(mark);
        result
    }

    /// Text of every produced file, joined with the content separator.
    ///
    /// `Ok(None)` when the engine ran but wrote none of the requested files.
    pub fn image_to_string(&mut self, image: ImageInput<'_>, opts: &Recognize) -> Result<Option<String>> {
        self.reject_pdf(opts, "image_to_string")?;

        let data = self.image_to_data(image, opts, DataOutput::String)?;
        if data.is_empty() {
            return Ok(None);
        }
        let sep = self.content_sep().to_string();
        let mut joined = String::new();
        for (i, item) in data.iter().enumerate() {
            if let Some(text) = item.record.as_ref().and_then(Record::as_text) {
                joined.push_str(text);
            }
            if i + 1 < data.len() {
                joined.push_str(&sep);
            }
        }
        Ok(Some(joined))
    }

    fn reject_pdf(&self, opts: &Recognize, operation: &'static str) -> Result<()> {
        if opts.formats.contains(OutputFormat::Pdf) {
            return Err(self.report(Error::UnsupportedFormat {
                format: "pdf",
                operation,
            }));
        }
        Ok(())
    }

    fn decode(&mut self, file: &OutputFile, mode: DataOutput) -> ExtractedData {
        let record = match normalize::normalize(&file.path, file.format, mode) {
            Ok(normalized) => {
                if let Some(err) = normalized.degraded {
                    if !self.markup_warned {
                        self.markup_warned = true;
                        self.report(err);
                    }
                }
                Some(normalized.record)
            }
            Err(err) => {
                self.report(err);
                None
            }
        };
        ExtractedData {
            format: file.format,
            record,
        }
    }
}
