use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Deserialize;

use empire_script::{Mode, load_triggers, script_driver};
use empire_sim::{run_pulses, schedule_all_mob_events};
use empire_types::{AttachType, ItemType};
use empire_world::time::PULSES_PER_MUD_HOUR;
use empire_world::{
    CharId, Character, EntityRef, GameConfig, Object, Room, RoomVnum, TrigVnum, Value, World,
};

/// First tile of the demo map row.
const FIRST_ROOM: RoomVnum = 18_000;
const DEMO_MOB: i32 = 1;
const DEMO_OBJ: i32 = 1;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML settings file; missing files fall back to the defaults.
    #[arg(long, default_value = "empire.toml")]
    config: PathBuf,

    /// Trigger file to load into the world.
    #[arg(long)]
    triggers: Option<PathBuf>,

    /// Seed for the world's random stream.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attach one trigger to a fitting entity and run it once, with the
    /// demo player as the actor.
    RunTrigger {
        vnum: TrigVnum,
        /// Advance this many pulses afterwards so waits can finish.
        #[arg(long, default_value_t = 0)]
        pulses: u64,
    },
    /// Attach every loaded trigger and advance the heartbeat.
    Tick {
        #[arg(default_value_t = PULSES_PER_MUD_HOUR)]
        pulses: u64,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    game: GameConfig,
    world: WorldSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct WorldSettings {
    /// Map tiles in the demo row.
    rooms: i32,
    /// Wall-clock seconds at pulse 0.
    epoch: u64,
    player_name: String,
    player_level: i32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            rooms: 5,
            epoch: 1_700_000_000,
            player_name: "Wanderer".to_string(),
            player_level: 10,
        }
    }
}

fn load_settings(path: &Path) -> Result<Settings> {
    config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("EMPIRE")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .wrap_err_with(|| format!("reading settings from {}", path.display()))?
        .try_deserialize()
        .wrap_err("invalid settings")
}

struct Demo {
    world: World,
    player: CharId,
    mob: CharId,
    room: RoomVnum,
}

/// A row of plains with the player, a mob and a loose object in the middle.
fn build_world(settings: Settings, seed: u64) -> Result<Demo> {
    let ws = settings.world;
    if ws.rooms < 1 {
        return Err(eyre!("the demo map needs at least one room"));
    }
    let mut world = World::new(settings.game, seed, ws.epoch);
    for i in 0..ws.rooms {
        world.add_room(Room::new(FIRST_ROOM + i, &format!("Plains {i}")));
    }
    let room = FIRST_ROOM + ws.rooms / 2;

    let mut player = Character::new_player(1, &ws.player_name, ws.player_level);
    player.daily_cycle = world.daily_cycle;
    let player = world.add_player(player, room);

    world
        .mob_protos
        .insert(DEMO_MOB, Character::new_mob(DEMO_MOB, "peddler", "a wandering peddler", 5));
    let mob = world.read_mobile(DEMO_MOB).wrap_err("loading the demo mob")?;
    world.char_to_room(mob, room);
    schedule_all_mob_events(&mut world, mob);

    world
        .obj_protos
        .insert(DEMO_OBJ, Object::new(DEMO_OBJ, "lantern", "a dented lantern", ItemType::Other));
    let obj = world.read_object(DEMO_OBJ).wrap_err("loading the demo object")?;
    world.obj_to_room(obj, room);

    Ok(Demo {
        world,
        player,
        mob,
        room,
    })
}

fn owner_for(demo: &Demo, attach: AttachType) -> Result<EntityRef> {
    match attach.effective() {
        AttachType::Mob => Ok(EntityRef::Char(demo.mob)),
        AttachType::Wld => Ok(EntityRef::Room(demo.room)),
        AttachType::Obj => demo
            .world
            .room(demo.room)
            .and_then(|r| r.contents.first().copied())
            .map(EntityRef::Obj)
            .ok_or_else(|| eyre!("no object to attach to")),
        other => Err(eyre!("the demo world has nothing to attach a {other:?} trigger to")),
    }
}

fn run_trigger(demo: &mut Demo, vnum: TrigVnum, pulses: u64) -> Result<()> {
    let attach = demo
        .world
        .trig_protos
        .get(&vnum)
        .map(|p| p.attach)
        .ok_or_else(|| eyre!("trigger {vnum} is not loaded"))?;
    let owner = owner_for(demo, attach)?;
    let trig = demo
        .world
        .attach_trigger(owner, vnum)
        .wrap_err_with(|| format!("attaching trigger {vnum}"))?;
    if let Some(actor) = demo.world.uid_of(EntityRef::Char(demo.player)) {
        if let Some(t) = demo.world.trigger_mut(owner, trig) {
            // a plain name always sets cleanly
            let _ = t.vars.set("actor", Value::Uid(actor), 0);
        }
    }
    let result = script_driver(&mut demo.world, owner, trig, Mode::New);
    log::info!("trigger {vnum} returned {}", result.ret_val);
    run_pulses(&mut demo.world, pulses);
    Ok(())
}

fn attach_all(demo: &mut Demo) {
    let protos: Vec<(TrigVnum, AttachType)> = demo
        .world
        .trig_protos
        .values()
        .map(|p| (p.vnum, p.attach))
        .collect();
    for (vnum, attach) in protos {
        match owner_for(demo, attach) {
            Ok(owner) => {
                if let Err(err) = demo.world.attach_trigger(owner, vnum) {
                    log::warn!("trigger {vnum} not attached: {err}");
                }
            }
            Err(err) => log::warn!("trigger {vnum} skipped: {err}"),
        }
    }
}

fn report(demo: &Demo) {
    if let Some(p) = demo.world.char(demo.player) {
        for line in &p.output {
            println!("{line}");
        }
    }
    for err in &demo.world.script_errors {
        eprintln!("{err}");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    let mut demo = build_world(settings, cli.seed)?;

    if let Some(path) = &cli.triggers {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading triggers from {}", path.display()))?;
        let count = load_triggers(&mut demo.world, &text)
            .wrap_err_with(|| format!("parsing {}", path.display()))?;
        log::info!("loaded {count} triggers from {}", path.display());
    }

    match cli.command {
        Command::RunTrigger { vnum, pulses } => run_trigger(&mut demo, vnum, pulses)?,
        Command::Tick { pulses } => {
            attach_all(&mut demo);
            run_pulses(&mut demo.world, pulses);
            log::info!(
                "ran {pulses} pulses; {} events pending",
                demo.world.events.len()
            );
        }
    }
    report(&demo);
    Ok(())
}
