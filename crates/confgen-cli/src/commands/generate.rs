//! Generate command - render the reference config from a CRD

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use confgen_engine::Engine;
use console::style;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// Where the CRD comes from and where the results go
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub api_output: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let crd = read_crd(args.file.as_deref())?;
    let template = args
        .template
        .as_deref()
        .map(|path| fs::read_to_string(path).map_err(|e| CliError::io_at(path, e)))
        .transpose()?;

    let engine = Engine::builder().strict(true).build();

    // Everything is rendered before the first write so a failure leaves no
    // partial output behind.
    let rendered = match &template {
        Some(source) => engine.render(source, &crd)?,
        None => engine.render_default(&crd)?,
    };
    let api = match &args.api_output {
        Some(_) => Some(engine.export_openapi(&crd)?),
        None => None,
    };
    debug!(bytes = rendered.len(), "rendered config");

    // Files are staged next to their targets and only moved into place once
    // every one of them has been written.
    let mut staged = Vec::new();
    if let Some(path) = &args.output {
        staged.push((path, stage(path, &rendered)?));
    }
    if let (Some(path), Some(json)) = (&args.api_output, &api) {
        staged.push((path, stage(path, json)?));
    }
    for (path, file) in staged {
        file.persist(path).map_err(|e| CliError::io_at(path, e.error))?;
        eprintln!("{} {}", style("wrote").green(), path.display());
    }

    if args.output.is_none() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

fn read_crd(file: Option<&Path>) -> Result<String> {
    let bytes = match file {
        Some(path) => {
            info!(path = %path.display(), "reading CRD");
            fs::read(path).map_err(|e| CliError::io_at(path, e))?
        }
        None => {
            info!("reading CRD from stdin");
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    String::from_utf8(bytes).map_err(|e| {
        CliError::input_with_help(
            format!("CRD is not valid UTF-8: {e}"),
            "Pass the CRD as a YAML or JSON text file.",
        )
    })
}

/// Write `content` to a temporary file in the directory of `path`
///
/// The temporary file is removed again when it is dropped without being
/// persisted.
fn stage(path: &Path, content: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| CliError::io_at(path, e))?;
    file.write_all(content.as_bytes()).map_err(|e| CliError::io_at(path, e))?;

    // Temporary files are created owner-only; keep the mode of an existing
    // target or use the usual 0644.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(path)
            .map(|meta| meta.permissions().mode())
            .unwrap_or(0o644);
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| CliError::io_at(path, e))?;
    }

    Ok(file)
}
