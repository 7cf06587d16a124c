use crate::open_store;
use crate::read_layout;
use anyhow::Result;
use anyhow::bail;
use navgroup_dom::MemoryDom;
use navgroup_engine::Organizer;
use navgroup_engine::PassOutcome;
use navgroup_engine::SidebarSnapshot;
use navgroup_engine::view;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, clap::Parser)]
pub struct PreviewArgs {
    /// Layout file describing the host sidebar.
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Click the entry with this visible label after grouping. Repeatable.
    /// Folder and section collapse changes are saved.
    #[arg(long = "click", value_name = "LABEL")]
    pub clicks: Vec<String>,

    /// Print the sidebar as JSON instead of an outline.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PreviewArgs) -> Result<()> {
    let layout = read_layout(&args.layout)?;
    let store = open_store()?;
    let mut dom = MemoryDom::new();
    layout.mount(&mut dom)?;

    let mut organizer = Organizer::new(store, layout.plugins);
    organizer.start(&mut dom);
    match organizer.on_probe_tick(&mut dom) {
        PassOutcome::Applied(report) => {
            info!(
                folders = report.folders,
                proxies = report.proxies,
                "sidebar grouped"
            );
        }
        PassOutcome::Idle => bail!("layout has no section item lists to group"),
    }
    organizer.on_mutations(&mut dom);
    organizer.release_suppression();

    for label in &args.clicks {
        let Some(target) = view::find_by_label(&dom, label) else {
            bail!("nothing labelled '{label}' is visible");
        };
        let outcome = organizer.handle_click(&mut dom, target);
        info!(%label, ?outcome, "clicked");
        organizer.on_mutations(&mut dom);
        organizer.release_suppression();
    }

    let snapshot = SidebarSnapshot::capture(&dom);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{snapshot}");
    }
    Ok(())
}
