use std::path::Path;

use bloblite_store::{
    summary_lines, BlobMetadata, ContainerStatus, Severity, Storage, StorageConfig, UploadOutcome,
};
use colored::Colorize;
use serde_json::json;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.root {
        Some(root) => StorageConfig::with_root(root),
        None => StorageConfig::from_env(),
    };
    let storage = Storage::open(&config);
    let format = cli.format;

    let output = match cli.resource {
        Resource::Container(args) => match args.action {
            ContainerAction::Create { name } => cmd_container_create(&storage, &format, &name),
            ContainerAction::List => cmd_container_list(&storage, &format),
        },
        Resource::Blob(args) => match args.action {
            BlobAction::Upload(args) => cmd_blob_upload(&storage, &format, args),
            BlobAction::Download(args) => cmd_blob_download(&storage, &format, args),
            BlobAction::List(args) => cmd_blob_list(&storage, &format, args),
            BlobAction::ShowMetadata(args) => cmd_blob_show_metadata(&storage, &format, args),
        },
    }?;
    println!("{output}");
    Ok(())
}

fn marker(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Ok => "✓".green().bold(),
        Severity::Info => "ℹ".blue().bold(),
        Severity::Warning => "!".yellow().bold(),
    }
}

fn to_json(value: &serde_json::Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn cmd_container_create(storage: &Storage, format: &OutputFormat, name: &str) -> anyhow::Result<String> {
    let status = storage.create_container(name)?;
    render_container_status(format, &status)
}

fn render_container_status(format: &OutputFormat, status: &ContainerStatus) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "container": status.name(),
            "created": status.is_created(),
        })),
        OutputFormat::Text => Ok(format!("{} {}", marker(status.severity()), status)),
    }
}

fn cmd_container_list(storage: &Storage, format: &OutputFormat) -> anyhow::Result<String> {
    let containers = storage.list_containers()?;
    render_names(format, "storage root", "container", &containers)
}

fn render_names(
    format: &OutputFormat,
    scope: &str,
    noun: &str,
    names: &[String],
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!(names)),
        OutputFormat::Text => Ok(summary_lines(scope, noun, names).join("\n")),
    }
}

fn cmd_blob_upload(storage: &Storage, format: &OutputFormat, args: UploadArgs) -> anyhow::Result<String> {
    let outcome = storage.upload_blob(&args.container, &args.file)?;
    render_upload(format, &outcome)
}

fn render_upload(format: &OutputFormat, outcome: &UploadOutcome) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "container": outcome.container(),
            "blob": outcome.blob_name(),
            "stored": outcome.is_stored(),
            "metadata": outcome.metadata(),
        })),
        OutputFormat::Text => Ok(format!("{} {}", marker(outcome.severity()), outcome)),
    }
}

fn cmd_blob_download(storage: &Storage, format: &OutputFormat, args: DownloadArgs) -> anyhow::Result<String> {
    let written = storage.download_blob(&args.container, &args.name, &args.dest)?;
    render_download(format, &args.container, &args.name, &written)
}

fn render_download(
    format: &OutputFormat,
    container: &str,
    blob: &str,
    written: &Path,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "container": container,
            "blob": blob,
            "path": written.display().to_string(),
        })),
        OutputFormat::Text => Ok(format!(
            "{} Downloaded '{}' to {}",
            marker(Severity::Ok),
            blob.yellow(),
            written.display().to_string().bold()
        )),
    }
}

fn cmd_blob_list(storage: &Storage, format: &OutputFormat, args: ListArgs) -> anyhow::Result<String> {
    let blobs = storage.list_blobs(&args.container, false)?;
    let scope = format!("container '{}'", args.container);
    render_names(format, &scope, "blob", &blobs)
}

fn cmd_blob_show_metadata(
    storage: &Storage,
    format: &OutputFormat,
    args: ShowMetadataArgs,
) -> anyhow::Result<String> {
    let metadata = storage.get_blob_metadata(&args.container, &args.name)?;
    render_metadata(format, &args.container, &args.name, metadata.as_ref())
}

fn render_metadata(
    format: &OutputFormat,
    container: &str,
    blob: &str,
    metadata: Option<&BlobMetadata>,
) -> anyhow::Result<String> {
    match (format, metadata) {
        (OutputFormat::Json, metadata) => to_json(&json!(metadata)),
        (OutputFormat::Text, Some(meta)) => Ok([
            format!("Blob {}", meta.name.yellow().bold()),
            format!("  Size: {} bytes", meta.size),
            format!("  Uploaded: {}", meta.uploaded_at.to_rfc3339().cyan()),
            format!("  Content type: {}", meta.content_type),
        ]
        .join("\n")),
        (OutputFormat::Text, None) => Ok(format!(
            "{} No metadata for blob '{}' in container '{}'",
            marker(Severity::Info),
            blob,
            container
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;

    const CSV: &[u8] = b"id,nombre\n1,Ana\n2,Luis\n";

    fn open(root: &Path) -> Storage {
        Storage::open(&StorageConfig::with_root(root))
    }

    fn run(root: &Path, args: &[&str]) -> anyhow::Result<()> {
        let root = root.to_str().unwrap();
        let mut argv = vec!["bloblite", "--root", root];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn container_create_reports_created_then_existing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path());

        let first = cmd_container_create(&storage, &OutputFormat::Text, "clients").unwrap();
        assert!(first.contains("container 'clients' created"), "{first}");
        let second = cmd_container_create(&storage, &OutputFormat::Text, "clients").unwrap();
        assert!(second.contains("already exists"), "{second}");

        let json: serde_json::Value =
            serde_json::from_str(&cmd_container_create(&storage, &OutputFormat::Json, "clients").unwrap())
                .unwrap();
        assert_eq!(json["container"], "clients");
        assert_eq!(json["created"], false);
    }

    #[test]
    fn container_list_renders_summary_and_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path());
        assert_eq!(
            cmd_container_list(&storage, &OutputFormat::Text).unwrap(),
            "storage root has no containers"
        );

        storage.create_container("b").unwrap();
        storage.create_container("a").unwrap();
        let text = cmd_container_list(&storage, &OutputFormat::Text).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            ["containers in storage root:", "  1. a", "  2. b", "total: 2 container(s)"]
        );

        let json: serde_json::Value =
            serde_json::from_str(&cmd_container_list(&storage, &OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json, json!(["a", "b"]));
    }

    #[test]
    fn blob_upload_download_and_metadata_output() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(&dir.path().join("root"));
        storage.create_container("clients").unwrap();
        let source = dir.path().join("data.csv");
        fs::write(&source, CSV).unwrap();

        let upload = UploadArgs { container: "clients".into(), file: source.clone() };
        let text = cmd_blob_upload(&storage, &OutputFormat::Text, upload).unwrap();
        assert!(text.contains("uploaded 'data.csv' to container 'clients'"), "{text}");

        let again = UploadArgs { container: "clients".into(), file: source.clone() };
        let json: serde_json::Value =
            serde_json::from_str(&cmd_blob_upload(&storage, &OutputFormat::Json, again).unwrap()).unwrap();
        assert_eq!(json["blob"], "data.csv");
        assert_eq!(json["stored"], false);
        assert!(json["metadata"].is_null());

        let list = ListArgs { container: "clients".into() };
        let json: serde_json::Value =
            serde_json::from_str(&cmd_blob_list(&storage, &OutputFormat::Json, list).unwrap()).unwrap();
        assert_eq!(json, json!(["data.csv"]));

        let show = ShowMetadataArgs { container: "clients".into(), name: "data.csv".into() };
        let json: serde_json::Value =
            serde_json::from_str(&cmd_blob_show_metadata(&storage, &OutputFormat::Json, show).unwrap())
                .unwrap();
        assert_eq!(json["name"], "data.csv");
        assert_eq!(json["size"], 23);

        let show = ShowMetadataArgs { container: "clients".into(), name: "data.csv".into() };
        let text = cmd_blob_show_metadata(&storage, &OutputFormat::Text, show).unwrap();
        assert!(text.contains("Size: 23 bytes"), "{text}");
        assert!(text.contains("Content type: application/octet-stream"), "{text}");

        let out_dir = dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        let download = DownloadArgs {
            container: "clients".into(),
            name: "data.csv".into(),
            dest: out_dir.clone(),
        };
        let text = cmd_blob_download(&storage, &OutputFormat::Text, download).unwrap();
        assert!(text.contains("Downloaded"), "{text}");
        assert!(text.contains(&out_dir.join("data.csv").display().to_string()), "{text}");
        assert_eq!(fs::read(out_dir.join("data.csv")).unwrap(), CSV);
    }

    #[test]
    fn download_json_reports_written_path() {
        let written = PathBuf::from("/tmp/out/a.txt");
        let json: serde_json::Value = serde_json::from_str(
            &render_download(&OutputFormat::Json, "c", "a.txt", &written).unwrap(),
        )
        .unwrap();
        assert_eq!(json, json!({"container": "c", "blob": "a.txt", "path": "/tmp/out/a.txt"}));
    }

    #[test]
    fn missing_metadata_is_reported_not_failed() {
        let text = render_metadata(&OutputFormat::Text, "clients", "nope.txt", None).unwrap();
        assert!(text.contains("No metadata for blob 'nope.txt' in container 'clients'"), "{text}");
        assert_eq!(render_metadata(&OutputFormat::Json, "clients", "nope.txt", None).unwrap(), "null");
    }

    #[test]
    fn full_command_line_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root");
        let source = dir.path().join("data.csv");
        fs::write(&source, CSV).unwrap();
        let source = source.to_str().unwrap();
        let dest = dir.path().to_str().unwrap();

        run(&root, &["container", "create", "clients"]).unwrap();
        run(&root, &["blob", "upload", "--container", "clients", "--file", source]).unwrap();

        fs::remove_file(dir.path().join("data.csv")).unwrap();
        run(&root, &["blob", "download", "--container", "clients", "--name", "data.csv", "--dest", dest])
            .unwrap();
        assert_eq!(fs::read(dir.path().join("data.csv")).unwrap(), CSV);
    }

    #[test]
    fn upload_into_missing_container_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, b"a").unwrap();

        let err = run(
            &dir.path().join("root"),
            &["blob", "upload", "--container", "ghost", "--file", source.to_str().unwrap()],
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
