use crate::project::ProjectContext;

pub async fn run(ctx: ProjectContext) -> anyhow::Result<()> {
    let command = &ctx.config.export_command;

    if which::which("godot").is_err() {
        log::warn!("`godot` is not on PATH; the export script may fail");
    }

    println!("Exporting web build in {}...", ctx.project_root.display());
    log::info!("Running `{command}`");

    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(&ctx.project_root)
        .stdin(std::process::Stdio::inherit())
        .stdout(std::process::Stdio::inherit())
        .stderr(std::process::Stdio::inherit())
        .status()
        .await?;

    std::process::exit(status.code().unwrap_or(1));
}
