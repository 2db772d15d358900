// crates/iec61850-genmodel/src/lib.rs

//! Shared front end of the `genmodel` and `genconfig` binaries.
//!
//! Both tools take `<configFile> [-ied <name>] [-ap <name>] [<output>]`.
//! The single-dash long options are rewritten by [`normalize_args`] before
//! `clap` sees them.

use clap::{Args, Parser};
use iec61850_scl::{
    compile_dynamic_from_str, compile_static_from_str, GeneratorConfig, IedSelection, SclError,
};
use log::{debug, info};
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that end a command line run.
#[derive(Debug)]
pub enum CliError {
    /// Reading the input or writing an output file failed.
    Io { path: PathBuf, source: io::Error },
    /// The SCL compiler rejected the input.
    Scl(SclError),
}

impl From<SclError> for CliError {
    fn from(e: SclError) -> Self {
        CliError::Scl(e)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            CliError::Scl(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io { source, .. } => Some(source),
            CliError::Scl(_) => None,
        }
    }
}

/// Input file and IED selection, common to both tools.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// SCL file to compile (.icd, .cid or .scd).
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: PathBuf,

    /// IED to compile. Defaults to the first IED of the file.
    #[arg(long = "ied", value_name = "NAME")]
    pub ied: Option<String>,

    /// Access point to compile. Defaults to the first access point of the IED.
    #[arg(long = "ap", value_name = "NAME")]
    pub access_point: Option<String>,
}

impl InputArgs {
    pub fn selection(&self) -> IedSelection {
        IedSelection::new(self.ied.clone(), self.access_point.clone())
    }

    /// Generator settings naming the input file in the output banner.
    pub fn generator_config(&self) -> GeneratorConfig {
        let source_name = self
            .config_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config_file.to_string_lossy().into_owned());
        GeneratorConfig::default().with_source_name(&source_name)
    }

    fn read_source(&self) -> Result<String, CliError> {
        fs::read_to_string(&self.config_file).map_err(|source| CliError::Io {
            path: self.config_file.clone(),
            source,
        })
    }
}

/// Arguments of `genmodel`.
#[derive(Debug, Parser)]
#[command(
    name = "genmodel",
    about = "Generate a static C server model (.c/.h) from an SCL file"
)]
pub struct GenModelArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output prefix; `<OUTPUT>.c` and `<OUTPUT>.h` are written.
    #[arg(value_name = "OUTPUT", default_value = "static_model")]
    pub output: PathBuf,
}

/// Arguments of `genconfig`.
#[derive(Debug, Parser)]
#[command(
    name = "genconfig",
    about = "Generate a dynamic server model description from an SCL file"
)]
pub struct GenConfigArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file. The model is printed to stdout when omitted.
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Rewrites the legacy `-ied` / `-ap` options to their `--` form.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let long = match arg.to_str() {
                Some("-ied") => Some("--ied"),
                Some("-ap") => Some("--ap"),
                _ => None,
            };
            long.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

/// Writes `contents` to a temporary file next to `path`, then renames it
/// over `path`. A failed run never leaves a half written output.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), CliError> {
    stage(path, contents)?.commit()
}

/// Output written to a temporary file in the directory of its target.
/// Dropping it without [`StagedFile::commit`] removes the temporary file.
struct StagedFile<'a> {
    file: NamedTempFile,
    target: &'a Path,
    len: usize,
}

fn stage<'a>(path: &'a Path, contents: &str) -> Result<StagedFile<'a>, CliError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    Ok(StagedFile {
        file,
        target: path,
        len: contents.len(),
    })
}

impl StagedFile<'_> {
    fn commit(self) -> Result<(), CliError> {
        let target = self.target;
        self.file.persist(target).map_err(|e| CliError::Io {
            path: target.to_path_buf(),
            source: e.error,
        })?;
        debug!("Wrote {} bytes to {}", self.len, target.display());
        Ok(())
    }
}

/// `prefix` + `.` + `extension`, keeping any dots already in the prefix.
fn with_extension_appended(prefix: &Path, extension: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Runs `genmodel` and returns the paths of the written `.c` and `.h` files.
pub fn run_genmodel(args: &GenModelArgs) -> Result<(PathBuf, PathBuf), CliError> {
    let xml = args.input.read_source()?;
    let model = compile_static_from_str(
        &xml,
        &args.input.selection(),
        &args.input.generator_config(),
    )?;

    let stem = args
        .output
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or("static_model");
    let sources = model.render_c_named(stem)?;

    let c_path = with_extension_appended(&args.output, "c");
    let h_path = with_extension_appended(&args.output, "h");
    // Both files are staged before either replaces an existing output.
    let c_file = stage(&c_path, &sources.c_source)?;
    let h_file = stage(&h_path, &sources.header)?;
    h_file.commit()?;
    c_file.commit()?;
    info!(
        "Static model of IED '{}' written to {} and {}",
        model.ied_name,
        c_path.display(),
        h_path.display()
    );
    Ok((c_path, h_path))
}

/// Runs `genconfig`, printing to `stdout` when no output file is given.
pub fn run_genconfig<W: Write>(args: &GenConfigArgs, stdout: &mut W) -> Result<(), CliError> {
    let xml = args.input.read_source()?;
    let text = compile_dynamic_from_str(
        &xml,
        &args.input.selection(),
        &args.input.generator_config(),
    )?;

    match &args.output {
        Some(path) => {
            write_atomically(path, &text)?;
            info!("Dynamic model written to {}", path.display());
        }
        None => stdout
            .write_all(text.as_bytes())
            .map_err(|source| CliError::Io {
                path: PathBuf::from("<stdout>"),
                source,
            })?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCL: &str = r#"<SCL>
      <IED name="IED1">
        <AccessPoint name="AP1">
          <Server>
            <LDevice inst="LD0">
              <LN0 lnClass="LLN0" lnType="LLN0_T" inst=""/>
            </LDevice>
          </Server>
        </AccessPoint>
        <AccessPoint name="AP2">
          <Server>
            <LDevice inst="LD9">
              <LN0 lnClass="LLN0" lnType="LLN0_T" inst=""/>
            </LDevice>
          </Server>
        </AccessPoint>
      </IED>
      <DataTypeTemplates>
        <LNodeType id="LLN0_T" lnClass="LLN0">
          <DO name="Beh" type="ENS_T"/>
        </LNodeType>
        <DOType id="ENS_T" cdc="ENS">
          <DA name="stVal" bType="INT32" fc="ST" dchg="true"><Val>3</Val></DA>
        </DOType>
      </DataTypeTemplates>
    </SCL>"#;

    fn write_input(dir: &Path) -> PathBuf {
        let path = dir.join("device.icd");
        fs::write(&path, SCL).unwrap();
        path
    }

    #[test]
    fn test_normalize_legacy_options() {
        let args = normalize_args(["genmodel", "a.icd", "-ied", "IED1", "-ap", "AP2", "out"]);
        assert_eq!(
            args,
            ["genmodel", "a.icd", "--ied", "IED1", "--ap", "AP2", "out"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn test_parse_genmodel_args() {
        let args = GenModelArgs::try_parse_from(normalize_args([
            "genmodel", "model.cid", "-ap", "AP2",
        ]))
        .unwrap();
        assert_eq!(args.input.config_file, PathBuf::from("model.cid"));
        assert_eq!(args.input.ied, None);
        assert_eq!(args.input.access_point.as_deref(), Some("AP2"));
        assert_eq!(args.output, PathBuf::from("static_model"));
        assert_eq!(args.input.generator_config().source_name, "model.cid");
    }

    #[test]
    fn test_genmodel_writes_both_files() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let prefix = dir.path().join("my_model");
        let args = GenModelArgs::try_parse_from([
            OsString::from("genmodel"),
            input.into_os_string(),
            prefix.into_os_string(),
        ])
        .unwrap();

        let (c_path, h_path) = run_genmodel(&args).unwrap();
        assert_eq!(c_path, dir.path().join("my_model.c"));

        let c = fs::read_to_string(&c_path).unwrap();
        assert!(c.contains(" * my_model.c"));
        assert!(c.contains("automatically generated from device.icd"));
        assert!(c.contains("iedModel_LD0_LLN0_Beh_stVal.mmsValue = MmsValue_newIntegerFromInt32(3);"));

        let h = fs::read_to_string(&h_path).unwrap();
        assert!(h.contains("#ifndef MY_MODEL_H_"));

        // Only the two outputs and the input remain; no temporary files.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_genmodel_keeps_old_source_when_header_fails() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let prefix = dir.path().join("my_model");
        fs::write(dir.path().join("my_model.c"), "old").unwrap();
        // A directory in place of the header makes its rename fail.
        fs::create_dir(dir.path().join("my_model.h")).unwrap();

        let args = GenModelArgs::try_parse_from([
            OsString::from("genmodel"),
            input.into_os_string(),
            prefix.into_os_string(),
        ])
        .unwrap();
        let result = run_genmodel(&args);
        assert!(matches!(result, Err(CliError::Io { .. })), "got {:?}", result);

        assert_eq!(fs::read_to_string(dir.path().join("my_model.c")).unwrap(), "old");
        // The staged temporary files are gone.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_genconfig_to_stdout_with_selection() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let args = GenConfigArgs::try_parse_from(normalize_args([
            OsString::from("genconfig"),
            input.into_os_string(),
            OsString::from("-ap"),
            OsString::from("AP2"),
        ]))
        .unwrap();

        let mut out = Vec::new();
        run_genconfig(&args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("MODEL(IED1){\nLD(IED1LD9){\n"));
        assert!(text.contains("DA(stVal 0 3 0 1 0)=3;"));
    }

    #[test]
    fn test_genconfig_to_file_replaces_existing() {
        let dir = tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("model.cfg");
        fs::write(&output, "stale").unwrap();

        let args = GenConfigArgs::try_parse_from([
            OsString::from("genconfig"),
            input.into_os_string(),
            output.clone().into_os_string(),
        ])
        .unwrap();
        let mut out = Vec::new();
        run_genconfig(&args, &mut out).unwrap();

        assert!(out.is_empty());
        assert!(fs::read_to_string(&output).unwrap().starts_with("MODEL(IED1){"));
    }

    #[test]
    fn test_errors() {
        let dir = tempdir().unwrap();
        let missing = GenConfigArgs::try_parse_from([
            OsString::from("genconfig"),
            dir.path().join("absent.icd").into_os_string(),
        ])
        .unwrap();
        let result = run_genconfig(&missing, &mut Vec::new());
        assert!(matches!(result, Err(CliError::Io { .. })), "got {:?}", result);

        let input = write_input(dir.path());
        let unknown = GenConfigArgs::try_parse_from(normalize_args([
            OsString::from("genconfig"),
            input.into_os_string(),
            OsString::from("-ied"),
            OsString::from("IED7"),
        ]))
        .unwrap();
        let result = run_genconfig(&unknown, &mut Vec::new());
        assert!(
            matches!(
                result,
                Err(CliError::Scl(SclError::IedOrAccessPointNotFound { .. }))
            ),
            "got {:?}",
            result
        );
    }
}
