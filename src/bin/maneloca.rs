use anyhow::{anyhow, Context};
use eframe::{egui, NativeOptions};
use maneloca::{about, app, config::ViewerConfig, logging};
use maneloca_protocol::resolve_route;
use std::env;
use tracing::info;

#[cfg(target_os = "macos")]
fn configure_macos_process_name() {
    use objc2_foundation::{ns_string, NSProcessInfo};
    // The native app menu reads its title from NSProcessInfo::processName.
    unsafe {
        NSProcessInfo::processInfo().setProcessName(ns_string!("ManeLoca"));
    }
}

#[cfg(not(target_os = "macos"))]
fn configure_macos_process_name() {}

fn main() -> anyhow::Result<()> {
    configure_macos_process_name();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    let mut config_path = None;
    let mut route_arg = None;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => config_path = rest.next().cloned(),
            a if !a.starts_with('-') && route_arg.is_none() => route_arg = Some(a.to_string()),
            _ => {}
        }
    }
    let config = ViewerConfig::load(config_path.as_deref()).context("Could not load settings")?;
    logging::init_tracing(&config.log_filter);

    // Start path such as `/grch38`; anything unknown lands on the default build.
    let route_arg = route_arg.unwrap_or_else(|| "/".to_string());
    let route = resolve_route(&route_arg, config.default_version);
    if route.redirected {
        info!(path = %route_arg, version = %route.version, "redirecting to default build");
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ManeLoca")
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([640.0, 360.0]),

        ..Default::default()
    };

    eframe::run_native(
        "ManeLoca",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ManeLocaApp::new(
                &cc.egui_ctx,
                config,
                route.version,
            )))
        }),
    )
    .map_err(|e| anyhow!("{e}"))
}
