use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use touchmap_control_osc::OscContactReceiver;
use touchmap_core::{
    load_engine_config_from, Binding, EngineConfig, MemoryStore, PadMapping, ParamDef,
};
use touchmap_pad::{ContactEvent, ContactId, PadId, PadSeed, PadSurface};
use touchmap_templates::TemplateLibrary;

#[derive(Debug, Clone)]
struct AppConfig {
    /// Engine config JSON (tuning + default mapping).
    config_path: Option<PathBuf>,
    /// Template library JSON; the built-in set is used when absent.
    templates_path: Option<PathBuf>,
    /// Template applied to the pad before any contact.
    template: Option<String>,
    /// Listen for OSC contacts instead of running the scripted gesture.
    osc_bind: Option<String>,
    seconds: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("[touchmap demo] error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage_and_exit() -> ! {
    eprintln!(
        "Usage:\n  touchmap-demo-headless-pad [--config FILE] [--templates FILE] [--template ID] [--osc ADDR [--seconds N]]\n\nOptions:\n  --config FILE     Engine config JSON (default: built-in tuning)\n  --templates FILE  Template library JSON (default: built-in templates)\n  --template ID     Apply this template before touching the pad\n  --osc ADDR        Read contacts from OSC on ADDR instead of the scripted gesture\n  --seconds N       How long to listen in OSC mode (default: 30)\n  --help, -h        Show this help and exit\n\nOSC message convention:\n  /pad/0/start <contact> <x> <y> [pressure]\n  /pad/0/move  <contact> <x> <y> [pressure]\n  /pad/0/end   <contact>\n\nParameters in this demo:\n  cutoff     (float 20..20000)\n  resonance  (float 0..1)\n  drive      (float 0..1)\n\nSet RUST_LOG=debug (or trace) for pipeline detail.\n"
    );
    std::process::exit(2);
}

fn parse_args() -> AppConfig {
    let mut args = std::env::args().skip(1);
    let mut cfg = AppConfig {
        config_path: None,
        templates_path: None,
        template: None,
        osc_bind: None,
        seconds: 30,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--config" => cfg.config_path = args.next().map(PathBuf::from),
            "--templates" => cfg.templates_path = args.next().map(PathBuf::from),
            "--template" => cfg.template = args.next(),
            "--osc" => cfg.osc_bind = args.next(),
            "--seconds" => {
                cfg.seconds = args
                    .next()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(cfg.seconds)
            }
            "--help" | "-h" => print_usage_and_exit(),
            _ => {
                eprintln!("Unknown arg: {a}");
                print_usage_and_exit();
            }
        }
    }
    cfg
}

fn demo_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .define("cutoff", ParamDef::float(20.0, 20_000.0), 1_000.0)
        .define("resonance", ParamDef::float(0.0, 1.0), 0.2)
        .define("drive", ParamDef::float(0.0, 1.0), 0.0);
    store
}

fn run() -> Result<()> {
    let app = parse_args();

    let config = match &app.config_path {
        Some(p) => load_engine_config_from(p)
            .with_context(|| format!("loading engine config {}", p.display()))?,
        None => EngineConfig::default(),
    };
    let templates = match &app.templates_path {
        Some(p) => TemplateLibrary::from_json_path(p)
            .with_context(|| format!("loading templates {}", p.display()))?,
        None => TemplateLibrary::builtin(),
    };
    tracing::info!(templates = templates.len(), "engine ready");

    let mut surface = PadSurface::new(config, templates);
    let seed = PadMapping::with_bindings(
        Binding::param("cutoff"),
        Binding::param("resonance"),
        Binding::param("drive"),
    );
    let pad = surface.add_pad(PadSeed::Explicit(seed));
    let controller = surface
        .pad_mut(pad)
        .ok_or_else(|| anyhow!("pad {} vanished", pad.0))?;

    controller.set_listener(|snapshot| match serde_json::to_string(snapshot) {
        Ok(json) => tracing::info!(%json, "mapping changed"),
        Err(e) => tracing::warn!(error = %e, "mapping snapshot not serializable"),
    });
    if let Some(id) = &app.template {
        if !controller.apply_template(id) {
            tracing::warn!(template = %id, "unknown template, pad stays custom");
        }
    }

    let mut store = demo_store();
    match &app.osc_bind {
        Some(addr) => listen(&mut surface, &mut store, addr, app.seconds)?,
        None => scripted_spread(&mut surface, &mut store, pad),
    }

    for w in store.writes().iter().rev().take(3) {
        tracing::info!(param = %w.id, value = w.value, "final write");
    }
    Ok(())
}

/// Two fingers land left and right of centre and pull apart.
fn scripted_spread(surface: &mut PadSurface, store: &mut MemoryStore, pad: PadId) {
    let (a, b) = (ContactId(1), ContactId(2));
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    let start = |id, x| ContactEvent::Start {
        id,
        x,
        y: 0.5,
        pressure: Some(0.6),
    };
    let slide = |id, x| ContactEvent::Move {
        id,
        x,
        y: 0.5,
        pressure: None,
    };

    let mut events = vec![(0, start(a, 0.45)), (10, start(b, 0.55))];
    for step in 1..=10u64 {
        let d = 0.05 + 0.025 * step as f32;
        events.push((10 + step * 16, slide(a, 0.5 - d)));
        events.push((18 + step * 16, slide(b, 0.5 + d)));
    }
    events.push((200, ContactEvent::End { id: a }));
    events.push((210, ContactEvent::End { id: b }));

    for (ms, event) in events {
        if let Some(readout) = surface.handle(store, pad, event, at(ms)) {
            tracing::info!(
                t_ms = ms,
                x = readout.x.display_value(),
                y = readout.y.display_value(),
                gesture = readout.gesture.display_value(),
                "frame"
            );
        }
    }
}

fn listen(
    surface: &mut PadSurface,
    store: &mut MemoryStore,
    addr: &str,
    seconds: u64,
) -> Result<()> {
    let mut osc = OscContactReceiver::bind(addr).with_context(|| format!("bind OSC {addr}"))?;
    tracing::info!(addr = %addr, seconds, "listening for OSC contacts");

    let deadline = Instant::now() + Duration::from_secs(seconds);
    while Instant::now() < deadline {
        if osc.pump(surface, store) == 0 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    Ok(())
}
