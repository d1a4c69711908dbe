//! Windowed shell: keyboard input, rodio playback, and a CPU-rendered view
//! of the simulation. All gameplay decisions live in the `game` library;
//! this binary only adapts OS events in and frames/sounds out.

use std::collections::HashMap;
use std::error::Error;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use winit::dpi::PhysicalSize;
use winit::event::VirtualKeyCode;

use engine::app::{run_shell, AppConfig, AppContext, GameShell, InputFrame};
use engine::graphics::{text_width, Color, Rect, Renderer2d};
use engine::surface::SurfaceSize;

use game::angle::ANGLE_STEP;
use game::assets::SpriteIndex;
use game::catch::CatchState;
use game::flight::FlightPhase;
use game::hands::HandKeys;
use game::playtest::SCRIPT_TICK;
use game::rails::Rail;
use game::rng::Rng;
use game::settings::{PlayerSettings, SettingsStore};
use game::sfx::{cues_for, LoopChannel, SoundCue, SoundId};
use game::state::{SkaterState, TickInput};
use game::tricks::TrickCatalog;
use game::world::SCROLL_SPEED;

const BG_COLOR: Color = [24, 26, 32, 255];
const FLOOR_COLOR: Color = [44, 46, 54, 255];
const FLOOR_SEAM_COLOR: Color = [60, 62, 72, 255];
const RAIL_COLOR: Color = [180, 184, 196, 255];
const BOARD_COLOR: Color = [222, 164, 60, 255];
const BOARD_AIR_COLOR: Color = [236, 208, 120, 255];
const BOARD_CATCHABLE_COLOR: Color = [110, 220, 130, 255];
const HUD_TEXT_COLOR: Color = [230, 230, 235, 255];
const HUD_DIM_COLOR: Color = [140, 142, 150, 255];
const BAR_BACK_COLOR: Color = [60, 62, 70, 255];
const BAR_FILL_COLOR: Color = [120, 200, 255, 255];
const GRIND_BAR_COLOR: Color = [255, 200, 90, 255];
const GOOD_COLOR: Color = [110, 220, 130, 255];
const BAD_COLOR: Color = [235, 90, 80, 255];
const DEATH_FLASH_COLOR: Color = [200, 30, 30, 255];

const BOARD_W: f32 = 96.0;
const BOARD_H: f32 = 24.0;

/// Longest wall-clock gap folded into the simulation in one update. Stalls
/// (window drags, debugger pauses) otherwise produce a burst of ticks.
const MAX_FRAME_DT: Duration = Duration::from_millis(250);

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_bool(name: &str) -> Option<bool> {
    let v = std::env::var(name).ok()?;
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

struct HeadfulCli {
    help: bool,
    seed: Option<u64>,
    assets: Option<PathBuf>,
}

fn print_headful_help() {
    println!("skate-sim headful shell");
    println!();
    println!("USAGE:");
    println!("  headful [--seed N] [--assets DIR]");
    println!();
    println!("OPTIONS:");
    println!("  --seed N      rail-spawn RNG seed (default 0)");
    println!("  --assets DIR  asset directory (default SKATE_ASSETS_DIR or game/assets)");
    println!("  --help        print this help");
    println!();
    println!("CONTROLS:");
    println!("  WASD          left hand   (W up, A left, S down, D right)");
    println!("  IJKL          right hand  (I up, J left, K down, L right)");
    println!("  arrow keys    rotate the idle board preview by 15 degrees");
    println!("  R             reset the board preview rotation");
    println!("  T             toggle the catchable-frame tint (saved to settings)");
    println!("  M             toggle mute (saved to settings)");
    println!("  Esc           quit");
    println!();
    println!("ENV:");
    println!("  SKATE_HEADFUL_WIDTH / SKATE_HEADFUL_HEIGHT   initial window size");
    println!("  SKATE_HEADFUL_VSYNC                          0/1 vsync override");
    println!("  SKATE_SEED                                   seed (CLI wins)");
}

fn parse_headful_cli() -> Result<HeadfulCli, String> {
    let mut cli = HeadfulCli {
        help: false,
        seed: None,
        assets: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--seed" => {
                let value = args.next().ok_or("--seed requires a value")?;
                cli.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid --seed value: {value}"))?,
                );
            }
            "--assets" => {
                let value = args.next().ok_or("--assets requires a value")?;
                cli.assets = Some(PathBuf::from(value));
            }
            other => return Err(format!("unknown argument: {other} (try --help)")),
        }
    }
    Ok(cli)
}

/// Decoded-on-play sample bank plus the named looping channels.
///
/// One-shots go through detached sinks so overlapping plays mix; each loop
/// channel holds at most one sink, replaced or stopped by cue.
struct Sfx {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bank: HashMap<SoundId, Samples>,
    loops: HashMap<LoopChannel, Sink>,
    gain: f32,
}

#[derive(Clone)]
struct Samples(Arc<Vec<u8>>);

impl AsRef<[u8]> for Samples {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn all_sound_ids() -> Vec<SoundId> {
    let mut ids = Vec::new();
    for i in 0..SoundId::POP_VARIANTS {
        ids.push(SoundId::Pop(i));
    }
    for i in 0..SoundId::CATCH_AMBIENT_VARIANTS {
        ids.push(SoundId::CatchAmbient(i));
    }
    for i in 0..SoundId::LAND_VARIANTS {
        ids.push(SoundId::Land(i));
    }
    ids.extend([
        SoundId::Success,
        SoundId::Fail,
        SoundId::Death,
        SoundId::CancelTrick,
        SoundId::Foot1,
        SoundId::Foot2,
        SoundId::WheelsRolling,
        SoundId::Rail,
    ]);
    ids
}

impl Sfx {
    fn new(sfx_dir: &Path, gain: f32) -> Result<Self, Box<dyn Error>> {
        let (stream, handle) = OutputStream::try_default()?;
        let mut bank = HashMap::new();
        for id in all_sound_ids() {
            let path = sfx_dir.join(id.file_name());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    bank.insert(id, Samples(Arc::new(bytes)));
                }
                Err(err) => {
                    eprintln!("warning: missing sfx {}: {err}", path.display());
                }
            }
        }
        Ok(Self {
            _stream: stream,
            handle,
            bank,
            loops: HashMap::new(),
            gain,
        })
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        for (channel, sink) in &self.loops {
            let id = match channel {
                LoopChannel::Wheels => SoundId::WheelsRolling,
                LoopChannel::Rail => SoundId::Rail,
            };
            sink.set_volume(id.volume() * gain);
        }
    }

    fn play_oneshot(&self, id: SoundId, speed: Option<f32>) {
        let Some(samples) = self.bank.get(&id) else {
            return;
        };
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(id.volume() * self.gain);
        let Ok(source) = Decoder::new(Cursor::new(samples.clone())) else {
            return;
        };
        match speed {
            Some(factor) => sink.append(source.speed(factor)),
            None => sink.append(source),
        }
        sink.detach();
    }

    fn start_loop(&mut self, channel: LoopChannel, id: SoundId) {
        self.stop_loop(channel);
        let Some(samples) = self.bank.get(&id) else {
            return;
        };
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(id.volume() * self.gain);
        let Ok(source) = Decoder::new(Cursor::new(samples.clone())) else {
            return;
        };
        sink.append(source.repeat_infinite());
        self.loops.insert(channel, sink);
    }

    fn stop_loop(&mut self, channel: LoopChannel) {
        if let Some(sink) = self.loops.remove(&channel) {
            sink.stop();
        }
    }

    fn handle_cue(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Play(id) => self.play_oneshot(id, None),
            SoundCue::PlayPitched(id, speed) => self.play_oneshot(id, Some(speed)),
            SoundCue::PlayLooping(channel, id) => self.start_loop(channel, id),
            SoundCue::Stop(channel) => self.stop_loop(channel),
        }
    }
}

fn hand_keys(input: &InputFrame, up: VirtualKeyCode, left: VirtualKeyCode, down: VirtualKeyCode, right: VirtualKeyCode) -> HandKeys {
    HandKeys {
        up: input.is_down(up),
        left: input.is_down(left),
        down: input.is_down(down),
        right: input.is_down(right),
    }
}

struct SkateShell {
    catalog: TrickCatalog,
    state: SkaterState,
    accumulator: Duration,
    settings: PlayerSettings,
    settings_store: SettingsStore,
    sfx: Option<Sfx>,
    /// Variant selection for one-shots only; simulation RNG lives in state.
    audio_rng: Rng,
    sprites: Option<SpriteIndex>,
    exit: bool,
}

impl SkateShell {
    fn save_settings(&self) {
        if let Err(err) = self.settings_store.save(&self.settings) {
            eprintln!("warning: failed to save settings: {err}");
        }
    }

    fn step_simulation(&mut self, input: &InputFrame) {
        let left = hand_keys(
            input,
            VirtualKeyCode::W,
            VirtualKeyCode::A,
            VirtualKeyCode::S,
            VirtualKeyCode::D,
        );
        let right = hand_keys(
            input,
            VirtualKeyCode::I,
            VirtualKeyCode::J,
            VirtualKeyCode::K,
            VirtualKeyCode::L,
        );

        while self.accumulator >= SCRIPT_TICK {
            self.accumulator -= SCRIPT_TICK;
            let tick = TickInput {
                left,
                right,
                dt: SCRIPT_TICK,
            };
            let events = self.state.tick(tick, &self.catalog);
            if let Some(sfx) = self.sfx.as_mut() {
                for event in events {
                    for cue in cues_for(event, &mut self.audio_rng) {
                        sfx.handle_cue(cue);
                    }
                }
            }
        }
    }

    fn handle_shell_keys(&mut self, input: &InputFrame) {
        if input.was_pressed(VirtualKeyCode::Escape) {
            self.exit = true;
        }
        if input.was_pressed(VirtualKeyCode::R) {
            self.state.reset_angle();
        }
        if input.was_pressed(VirtualKeyCode::T) {
            self.settings.gameplay.landing_detection = !self.settings.gameplay.landing_detection;
            self.save_settings();
        }
        if input.was_pressed(VirtualKeyCode::M) {
            self.settings.audio.mute_all = !self.settings.audio.mute_all;
            if let Some(sfx) = self.sfx.as_mut() {
                sfx.set_gain(self.settings.audio.effective_sfx_gain());
            }
            self.save_settings();
        }

        // Arrow keys spin the idle board preview through the sprite table.
        let step = ANGLE_STEP as f32;
        let (mut shuv, mut flip) = self.state.angle();
        if input.was_pressed(VirtualKeyCode::Left) {
            shuv -= step;
        }
        if input.was_pressed(VirtualKeyCode::Right) {
            shuv += step;
        }
        if input.was_pressed(VirtualKeyCode::Up) {
            flip += step;
        }
        if input.was_pressed(VirtualKeyCode::Down) {
            flip -= step;
        }
        if (shuv, flip) != self.state.angle() {
            self.state.set_angle(shuv.rem_euclid(360.0), flip.rem_euclid(360.0));
        }
    }

    /// Whether the current airborne frame would count as a clean catch.
    fn on_catchable_frame(&self) -> bool {
        match self.state.phase() {
            FlightPhase::Airborne { anim, catch, .. } => {
                catchable(catch, anim.frame())
            }
            _ => false,
        }
    }

    fn draw_floor(&self, gfx: &mut dyn Renderer2d, size: SurfaceSize) {
        let floor_y = size.height as f32 * 0.55;
        if let Some(rect) =
            Rect::clipped_from_f32(0.0, floor_y, size.width as f32, size.height as f32 - floor_y)
        {
            gfx.fill_rect(rect, FLOOR_COLOR);
        }

        // Seams every 200px, shifted by the scroll offset so the ground
        // visibly moves (and visibly freezes on a bail).
        let span = 200.0;
        let offset = self.state.world().offset().rem_euclid(span);
        let mut x = offset - span;
        while x < size.width as f32 {
            if let Some(rect) =
                Rect::clipped_from_f32(x, floor_y, 4.0, size.height as f32 - floor_y)
            {
                gfx.fill_rect(rect, FLOOR_SEAM_COLOR);
            }
            x += span;
        }
    }

    fn draw_rails(&self, gfx: &mut dyn Renderer2d) {
        for rail in self.state.rails().rails() {
            self.draw_rail(gfx, rail);
        }
    }

    fn draw_rail(&self, gfx: &mut dyn Renderer2d, rail: &Rail) {
        if let Some(rect) =
            Rect::clipped_from_f32(rail.x, rail.y - rail.height, rail.stretched_width(), rail.height)
        {
            gfx.fill_rect(rect, RAIL_COLOR);
        }
        // Rail legs at both ends.
        for leg_x in [rail.x, rail.end_x() - 6.0] {
            if let Some(rect) = Rect::clipped_from_f32(leg_x, rail.y, 6.0, 40.0) {
                gfx.fill_rect(rect, RAIL_COLOR);
            }
        }
    }

    fn draw_board(&self, gfx: &mut dyn Renderer2d) {
        let skater = self.state.skater_point();
        let phase = self.state.phase();

        let (lift, color) = match phase {
            FlightPhase::Grounded => (0.0, BOARD_COLOR),
            FlightPhase::Airborne { .. } => {
                let tint = if self.settings.gameplay.landing_detection && self.on_catchable_frame()
                {
                    BOARD_CATCHABLE_COLOR
                } else {
                    BOARD_AIR_COLOR
                };
                (120.0, tint)
            }
            FlightPhase::GrindWindow { .. } => (60.0, BOARD_AIR_COLOR),
            FlightPhase::Grinding { .. } => (18.0, BOARD_COLOR),
            FlightPhase::Dead { .. } => (0.0, BAD_COLOR),
        };

        let x = skater.x - BOARD_W / 2.0;
        let y = skater.y - BOARD_H - lift;
        if let Some(rect) = Rect::clipped_from_f32(x, y, BOARD_W, BOARD_H) {
            gfx.fill_rect(rect, color);
        }

        // While a flip animation is live (airborne, grind window, death),
        // show it as a frame counter strip under the board, one notch per
        // logical frame.
        if let Some(anim) = phase.animation() {
            let meta = anim.trick().meta();
            let notch_w = BOARD_W / meta.frames.max(1) as f32;
            for frame in 0..=anim.frame().min(meta.frames.saturating_sub(1)) {
                if let Some(rect) = Rect::clipped_from_f32(
                    x + frame as f32 * notch_w,
                    y + BOARD_H + 4.0,
                    (notch_w - 1.0).max(1.0),
                    4.0,
                ) {
                    gfx.fill_rect(rect, BAR_FILL_COLOR);
                }
            }
            gfx.draw_text(
                x as u32,
                (y - 14.0).max(0.0) as u32,
                &format!("{} {}/{}", anim.trick().name().to_uppercase(), anim.frame() + 1, meta.frames),
                HUD_TEXT_COLOR,
            );
        }

        // Idle board preview sprite, when the sheet index knows the angle.
        if phase.is_grounded() {
            let (shuv, flip) = self.state.angle();
            if let Some(index) = self.sprites.as_ref() {
                if let Some(sprite) = index.sprite_for_angle(shuv, flip) {
                    gfx.draw_text(
                        x as u32,
                        (y - 14.0).max(0.0) as u32,
                        &format!("SHEET {}:{}", sprite.y / sprite.h, sprite.x / sprite.w),
                        HUD_DIM_COLOR,
                    );
                }
            }
        }
    }

    fn draw_hud(&self, gfx: &mut dyn Renderer2d, size: SurfaceSize) {
        let (left, right) = self.state.last_combination();
        gfx.draw_text(
            16,
            16,
            &format!("L:{left:?} R:{right:?}").to_uppercase(),
            HUD_DIM_COLOR,
        );

        if let Some(trick) = self.state.phase().active_trick() {
            gfx.draw_text(16, 40, &trick.name().to_uppercase(), HUD_TEXT_COLOR);
        }
        if let Some(grind) = self.state.phase().grind_trick() {
            gfx.draw_text(16, 40, &grind.name().to_uppercase(), HUD_TEXT_COLOR);
        }

        if self.settings.gameplay.show_hold_progress {
            if let Some(progress) = self.state.hold_progress() {
                draw_bar(gfx, 16, 64, 160, 10, progress, BAR_FILL_COLOR);
            }
        }
        if let Some(fraction) = self.state.grind_window_fraction() {
            draw_bar(gfx, 16, 64, 160, 10, fraction, GRIND_BAR_COLOR);
            gfx.draw_text(184, 62, "GRIND!", GRIND_BAR_COLOR);
        }

        if let Some(positive) = self.state.catch_feedback() {
            let (text, color) = if positive {
                ("CAUGHT!", GOOD_COLOR)
            } else {
                ("MISSED!", BAD_COLOR)
            };
            center_text(gfx, size, size.height / 3, text, color);
        }
        if let Some(positive) = self.state.landing_feedback() {
            let (text, color) = if positive {
                ("CLEAN LANDING", GOOD_COLOR)
            } else {
                ("BAILED", BAD_COLOR)
            };
            center_text(gfx, size, size.height / 3 + 28, text, color);
        }

        if self.state.world().speed() != SCROLL_SPEED {
            gfx.draw_text(16, size.height.saturating_sub(28), "DOWN", BAD_COLOR);
        }
        if self.settings.audio.mute_all {
            gfx.draw_text(
                size.width.saturating_sub(80),
                16,
                "MUTED",
                HUD_DIM_COLOR,
            );
        }
    }
}

/// `CatchState::perfect` holds the frames the original tuning counts as a
/// clean catch; anything else is a sloppy (fatal) attempt.
fn catchable(catch: &CatchState, frame: u32) -> bool {
    catch.perfect().contains(&frame)
}

fn draw_bar(gfx: &mut dyn Renderer2d, x: u32, y: u32, w: u32, h: u32, fraction: f32, color: Color) {
    gfx.fill_rect(Rect::new(x, y, w, h), BAR_BACK_COLOR);
    let fill = (w as f32 * fraction.clamp(0.0, 1.0)) as u32;
    if fill > 0 {
        gfx.fill_rect(Rect::new(x, y, fill, h), color);
    }
    gfx.rect_outline(Rect::new(x, y, w, h), HUD_DIM_COLOR);
}

fn center_text(gfx: &mut dyn Renderer2d, size: SurfaceSize, y: u32, text: &str, color: Color) {
    let w = text_width(text, 3);
    let x = (size.width.saturating_sub(w)) / 2;
    gfx.draw_text_scaled(x, y, text, color, 3);
}

impl GameShell for SkateShell {
    fn update(&mut self, input: &InputFrame, dt: Duration, _ctx: &mut AppContext) {
        self.handle_shell_keys(input);
        self.accumulator += dt.min(MAX_FRAME_DT);
        self.step_simulation(input);
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        let size = gfx.size();
        gfx.clear(BG_COLOR);
        self.draw_floor(gfx, size);
        self.draw_rails(gfx);
        self.draw_board(gfx);
        self.draw_hud(gfx, size);

        if self.state.phase().is_dead() {
            gfx.blend_rect(
                Rect::from_size(size.width, size.height),
                DEATH_FLASH_COLOR,
                70,
            );
        }
    }

    fn wants_exit(&self) -> bool {
        self.exit
    }
}

fn default_assets_dir() -> PathBuf {
    std::env::var_os("SKATE_ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("game/assets"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = match parse_headful_cli() {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };
    if cli.help {
        print_headful_help();
        return Ok(());
    }

    let seed = cli.seed.or_else(|| env_u64("SKATE_SEED")).unwrap_or(0);
    let assets = cli.assets.unwrap_or_else(default_assets_dir);

    let settings_store = SettingsStore::from_env();
    let settings = settings_store.load();

    let catalog = TrickCatalog::new()?;

    let sfx = match Sfx::new(&assets.join("sfx"), settings.audio.effective_sfx_gain()) {
        Ok(sfx) => Some(sfx),
        Err(err) => {
            eprintln!("warning: audio disabled: {err}");
            None
        }
    };

    let sprite_table = assets.join("sprites").join("index.txt");
    let sprites = match SpriteIndex::load(&sprite_table) {
        Ok(index) => {
            println!("loaded {} board sprites from {}", index.len(), sprite_table.display());
            Some(index)
        }
        Err(err) => {
            eprintln!(
                "warning: no sprite table at {}: {err}",
                sprite_table.display()
            );
            None
        }
    };

    let width = env_u32("SKATE_HEADFUL_WIDTH").unwrap_or(1920).max(1);
    let height = env_u32("SKATE_HEADFUL_HEIGHT").unwrap_or(1080).max(1);

    let shell = SkateShell {
        catalog,
        state: SkaterState::new(width as f32, height as f32, seed),
        accumulator: Duration::ZERO,
        settings,
        settings_store,
        sfx,
        // Distinct stream from the simulation seed so audio variety never
        // tracks rail spawns.
        audio_rng: Rng::new(seed.wrapping_add(0xA5A5)),
        sprites,
        exit: false,
    };

    run_shell(
        AppConfig {
            title: "Skate Sim".to_string(),
            desired_size: PhysicalSize::new(width, height),
            clamp_to_monitor: true,
            vsync: env_bool("SKATE_HEADFUL_VSYNC"),
        },
        shell,
    )
}
