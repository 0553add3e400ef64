use tasklist_core::tracing_setup::init_tracing;
use tasklist_core::{CoreConfig, CoreRuntime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CoreConfig::from_env();
    init_tracing(&config);

    eprintln!("=== Task List State Debugger ===\n");
    eprintln!("Data dir: {}", config.data_dir.display());

    let runtime = CoreRuntime::open(&config).await?;

    if let Some(error) = runtime.lists().last_load_error() {
        eprintln!("⚠ Lists did not load: {}", error);
    }
    if let Some(error) = runtime.groups().last_load_error() {
        eprintln!("⚠ Groups did not load: {}", error);
    }

    eprintln!(
        "Onboarding: {:?}\n",
        runtime.onboarding().state().await
    );

    let lists = runtime.lists().lists();
    eprintln!("📋 Lists: {}", lists.len());
    for list in &lists {
        let stats = list.stats();
        eprintln!(
            "  - {} (id: {}) {}/{} done, {} important",
            list.title, list.id, stats.completed, stats.total, stats.important
        );
        for task in &list.tasks {
            eprintln!(
                "      [{}]{} {}",
                if task.completed { "x" } else { " " },
                if task.important { " !" } else { "" },
                task.text
            );
        }
    }

    let groups = runtime.groups().groups();
    eprintln!("\n📁 Groups: {}", groups.len());
    for group in &groups {
        eprintln!("  - {} (id: {}) {} list(s)", group.name, group.id, group.list_count());
        for list_id in &group.lists {
            let title = runtime
                .lists()
                .get(list_id)
                .map(|l| l.title)
                .unwrap_or_else(|| "<missing>".to_string());
            eprintln!("      {} ({})", title, list_id);
        }
    }

    Ok(())
}
