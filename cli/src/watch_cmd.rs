use crate::open_store;
use crate::read_layout;
use anyhow::Context;
use anyhow::Result;
use navgroup_config::SettingsEdit;
use navgroup_dom::Dom;
use navgroup_dom::MemoryDom;
use navgroup_dom::layout;
use navgroup_dom::layout::Layout;
use navgroup_engine::ClickOutcome;
use navgroup_engine::Driver;
use navgroup_engine::EngineEventSender;
use navgroup_engine::InstalledPlugins;
use navgroup_engine::Organizer;
use navgroup_engine::SidebarSnapshot;
use navgroup_engine::view;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;
use tracing::warn;

#[derive(Debug, clap::Parser)]
pub struct WatchArgs {
    /// Layout file describing the host sidebar.
    #[arg(long, value_name = "FILE")]
    pub layout: PathBuf,

    /// Script of host changes and user clicks to replay.
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// Start with the sidebar closed; a script `open` step mounts it.
    #[arg(long)]
    pub closed: bool,

    /// How long to keep running after the last step.
    #[arg(long, value_name = "MS", default_value_t = 1500)]
    pub linger_ms: u64,
}

/// ```toml
/// [[step]]
/// after_ms = 1200
/// action = "add"
/// section = "Community plugins"
/// label = "Day Planner"
///
/// [[step]]
/// action = "edit"
/// edit = { type = "set_compact_mode", enabled = true }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Script {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Delay after the previous step.
    #[serde(default)]
    pub after_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// The host opens its settings view.
    Open,
    Close,
    Add { section: String, label: String },
    Remove { label: String },
    /// The host highlights an item by itself.
    Activate { label: String },
    Rerender { section: String },
    /// The user clicks whatever is visible under this label.
    Click { label: String },
    Install { name: String },
    Uninstall { name: String },
    Edit { edit: SettingsEdit },
    Recheck,
}

impl Script {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

fn read_script(path: &Path) -> Result<Script> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    Script::from_toml_str(&raw).with_context(|| format!("invalid script {}", path.display()))
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let layout = read_layout(&args.layout)?;
    let script = read_script(&args.script)?;
    let store = open_store()?;

    let mut dom = MemoryDom::new();
    if !args.closed {
        layout.mount(&mut dom)?;
    }
    let installed = InstalledPlugins::new(layout.plugins.clone());
    let organizer = Organizer::new(store, installed.clone());

    let mut pass = 0usize;
    let (driver, events) = Driver::new(dom, organizer);
    let driver = driver
        .on_pass(move |dom, report| {
            pass += 1;
            println!(
                "--- pass {pass}: {} folder(s), {} entries",
                report.folders, report.proxies
            );
            print!("{}", SidebarSnapshot::capture(dom));
        })
        .on_click(|_, outcome| println!("--- click: {}", describe_click(outcome)));

    let replay = async {
        for step in script.steps {
            sleep(Duration::from_millis(step.after_ms)).await;
            info!(action = ?step.action, "script step");
            perform(step.action, &layout, &installed, &events);
        }
        sleep(Duration::from_millis(args.linger_ms)).await;
        events.shutdown();
    };

    let (exit, ()) = tokio::join!(driver.run(), replay);
    println!(
        "--- stopped after {} pass(es)",
        exit.organizer.stats().passes
    );
    Ok(())
}

fn perform(
    action: StepAction,
    sidebar: &Layout,
    installed: &InstalledPlugins,
    events: &EngineEventSender<MemoryDom>,
) {
    match action {
        StepAction::Open => {
            let sidebar = sidebar.clone();
            events.host(move |dom| {
                if let Err(err) = sidebar.mount(dom) {
                    warn!("failed to open the sidebar: {err}");
                }
            });
        }
        StepAction::Close => events.host(|dom| {
            layout::unmount(dom);
        }),
        StepAction::Add { section, label } => events.host(move |dom| {
            if let Err(err) = layout::add_item(dom, &section, &label) {
                warn!("failed to add {label}: {err}");
            }
        }),
        StepAction::Remove { label } => events.host(move |dom| {
            if !layout::remove_item(dom, &label) {
                warn!("no item labelled {label} to remove");
            }
        }),
        StepAction::Activate { label } => events.host(move |dom| {
            match layout::find_item(dom, &label) {
                Some(item) => dom.click(item),
                None => warn!("no item labelled {label} to activate"),
            }
        }),
        StepAction::Rerender { section } => events.host(move |dom| {
            if let Err(err) = layout::rerender_section(dom, &section) {
                warn!("failed to re-render {section}: {err}");
            }
        }),
        StepAction::Click { label } => {
            let clicks = events.clone();
            events.host(move |dom| match view::find_by_label(dom, &label) {
                Some(target) => clicks.click(target),
                None => warn!("nothing labelled {label} is visible"),
            });
        }
        StepAction::Install { name } => {
            installed.install(name);
            events.recheck();
        }
        StepAction::Uninstall { name } => {
            installed.uninstall(&name);
            events.recheck();
        }
        StepAction::Edit { edit } => events.edit(edit),
        StepAction::Recheck => events.recheck(),
    }
}

fn describe_click(outcome: &ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Forwarded(item) => format!("forwarded to {item}"),
        ClickOutcome::Fallback(item) => format!("fell back to {item}"),
        ClickOutcome::GroupToggled { title, open } => {
            format!("{title} {}", if *open { "opened" } else { "closed" })
        }
        ClickOutcome::SectionToggled { label, collapsed } => {
            format!("{label} {}", if *collapsed { "collapsed" } else { "expanded" })
        }
        ClickOutcome::CompactOpened(item) => format!("opened {item}"),
        ClickOutcome::Host => "passed to the host".to_string(),
        ClickOutcome::Ignored => "ignored".to_string(),
    }
}
