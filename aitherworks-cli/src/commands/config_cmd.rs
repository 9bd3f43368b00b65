use crate::project::ProjectContext;

pub fn run(ctx: ProjectContext) -> anyhow::Result<()> {
    println!("# {} ({:?})", ctx.project_root.display(), ctx.kind);
    print!("{}", toml::to_string(&ctx.config)?);
    Ok(())
}
