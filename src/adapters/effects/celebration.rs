use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

const CONFETTI_PALETTE: [&str; 6] = ["#22d3ee", "#fbbf24", "#f87171", "#a78bfa", "#34d399", "#fb7185"];
const BRAND: &str = "#22d3ee";

pub const MESSAGES: [&str; 6] = [
    "🎉 Great job!",
    "✨ Task completed!",
    "🌟 Well done!",
    "🎊 Awesome!",
    "💫 Nice work!",
    "🚀 Keep it up!",
];

const CONFETTI_PIECES: usize = 50;
const CONFETTI_LIFETIME: Duration = Duration::from_millis(3000);
const MESSAGE_LIFETIME: Duration = Duration::from_millis(2000);
const FULL_CELEBRATION_GUARD: Duration = Duration::from_millis(2000);

const FIREWORK_BURSTS: u32 = 3;
const FIREWORK_STAGGER: Duration = Duration::from_millis(300);
const FIREWORK_FUSE: Duration = Duration::from_millis(100);
const FIREWORK_SPARKS: usize = 12;
const FIREWORK_FADE: Duration = Duration::from_millis(800);
const FIREWORK_LIFETIME: Duration = Duration::from_millis(1100);

/// Parse hex color string to RGB values
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn palette_color(hex: &str) -> Color {
    hex_to_rgb(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    /// Column as a fraction of the width
    pub x: f32,
    pub color: Color,
    pub delay: f32,
    /// Seconds to fall the full height
    pub fall: f32,
    pub round: bool,
}

#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    pub started: Instant,
    pub pieces: Vec<ConfettiPiece>,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub started: Instant,
    pub text: &'static str,
}

#[derive(Debug, Clone)]
pub struct Spark {
    pub angle: f32,
    /// Final radius in cells
    pub distance: f32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct Firework {
    pub launch: Instant,
    /// Position as fractions of the area
    pub x: f32,
    pub y: f32,
    pub sparks: Vec<Spark>,
}

/// Terminal rendition of confetti, celebration text and fireworks.
///
/// Everything is keyed to wall-clock instants passed in by the caller, so the
/// UI loop drives it from its tick and tests can step time by hand.
pub struct Celebrations {
    rng: StdRng,
    confetti: Vec<ConfettiBurst>,
    banners: Vec<Banner>,
    fireworks: Vec<Firework>,
    animating_until: Option<Instant>,
}

impl Default for Celebrations {
    fn default() -> Self {
        Self::new()
    }
}

impl Celebrations {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            confetti: Vec::new(),
            banners: Vec::new(),
            fireworks: Vec::new(),
            animating_until: None,
        }
    }

    pub fn confetti(&mut self, now: Instant) {
        let pieces = (0..CONFETTI_PIECES)
            .map(|_| ConfettiPiece {
                x: self.rng.gen_range(0.0..1.0),
                color: palette_color(CONFETTI_PALETTE[self.rng.gen_range(0..CONFETTI_PALETTE.len())]),
                delay: self.rng.gen_range(0.0..0.5),
                fall: self.rng.gen_range(2.0..3.0),
                round: self.rng.gen_bool(0.5),
            })
            .collect();

        self.confetti.push(ConfettiBurst { started: now, pieces });
    }

    pub fn banner(&mut self, now: Instant) {
        let text = MESSAGES[self.rng.gen_range(0..MESSAGES.len())];
        self.banners.push(Banner { started: now, text });
    }

    /// Confetti plus a message. Ignored while the previous one is running.
    pub fn trigger_full(&mut self, now: Instant) -> bool {
        if self.animating_until.is_some_and(|until| now < until) {
            return false;
        }

        self.animating_until = Some(now + FULL_CELEBRATION_GUARD);
        self.confetti(now);
        self.banner(now);
        true
    }

    pub fn fireworks(&mut self, now: Instant) {
        for burst in 0..FIREWORK_BURSTS {
            let sparks = (0..FIREWORK_SPARKS)
                .map(|i| Spark {
                    angle: i as f32 / FIREWORK_SPARKS as f32 * TAU,
                    distance: self.rng.gen_range(5.0..10.0),
                    color: palette_color(CONFETTI_PALETTE[self.rng.gen_range(0..4)]),
                })
                .collect();

            self.fireworks.push(Firework {
                launch: now + FIREWORK_STAGGER * burst,
                x: self.rng.gen_range(0.0..1.0),
                y: self.rng.gen_range(0.2..0.7),
                sparks,
            });
        }
    }

    /// Drop everything whose animation has finished.
    pub fn prune(&mut self, now: Instant) {
        self.confetti
            .retain(|burst| now.saturating_duration_since(burst.started) < CONFETTI_LIFETIME);
        self.banners
            .retain(|banner| now.saturating_duration_since(banner.started) < MESSAGE_LIFETIME);
        self.fireworks
            .retain(|fw| now < fw.launch || now.duration_since(fw.launch) < FIREWORK_LIFETIME);
        if self.animating_until.is_some_and(|until| now >= until) {
            self.animating_until = None;
        }
    }

    pub fn is_idle(&self) -> bool {
        self.confetti.is_empty() && self.banners.is_empty() && self.fireworks.is_empty()
    }

    pub fn overlay(&self, now: Instant) -> CelebrationOverlay<'_> {
        CelebrationOverlay {
            celebrations: self,
            now,
        }
    }
}

fn put(buf: &mut Buffer, area: Rect, x: f32, y: f32, symbol: &str, style: Style) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (col, row) = (area.x + x as u16, area.y + y as u16);
    if col >= area.right() || row >= area.bottom() {
        return;
    }
    if let Some(cell) = buf.cell_mut((col, row)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

pub struct CelebrationOverlay<'a> {
    celebrations: &'a Celebrations,
    now: Instant,
}

impl CelebrationOverlay<'_> {
    fn render_confetti(&self, area: Rect, buf: &mut Buffer) {
        for burst in &self.celebrations.confetti {
            let elapsed = self.now.saturating_duration_since(burst.started).as_secs_f32();
            for piece in &burst.pieces {
                let progress = (elapsed - piece.delay) / piece.fall;
                if !(0.0..1.0).contains(&progress) {
                    continue;
                }
                let symbol = if piece.round { "●" } else { "■" };
                put(
                    buf,
                    area,
                    piece.x * area.width as f32,
                    progress * area.height as f32,
                    symbol,
                    Style::default().fg(piece.color),
                );
            }
        }
    }

    fn render_fireworks(&self, area: Rect, buf: &mut Buffer) {
        for fw in &self.celebrations.fireworks {
            if self.now < fw.launch {
                continue;
            }
            let cx = fw.x * area.width as f32;
            let cy = fw.y * area.height as f32;
            let since_launch = self.now.duration_since(fw.launch);

            if since_launch < FIREWORK_FUSE {
                put(buf, area, cx, cy, "•", Style::default().fg(palette_color(BRAND)));
                continue;
            }

            let t = (since_launch - FIREWORK_FUSE).as_secs_f32() / FIREWORK_FADE.as_secs_f32();
            if t >= 1.0 {
                continue;
            }
            let mut style = Style::default();
            if t > 0.5 {
                style = style.add_modifier(Modifier::DIM);
            }
            for spark in &fw.sparks {
                let reach = spark.distance * t;
                // cells are roughly twice as tall as they are wide
                put(
                    buf,
                    area,
                    cx + spark.angle.cos() * reach,
                    cy + spark.angle.sin() * reach * 0.5,
                    "*",
                    style.fg(spark.color),
                );
            }
        }
    }

    fn render_banners(&self, area: Rect, buf: &mut Buffer) {
        let row = area.y + area.height * 3 / 10;
        for banner in &self.celebrations.banners {
            let elapsed = self.now.saturating_duration_since(banner.started);
            if elapsed >= MESSAGE_LIFETIME {
                continue;
            }
            let mut style = Style::default()
                .fg(palette_color(BRAND))
                .add_modifier(Modifier::BOLD);
            if elapsed.as_secs_f32() > MESSAGE_LIFETIME.as_secs_f32() * 0.8 {
                style = style.add_modifier(Modifier::DIM);
            }

            let width = Span::raw(banner.text).width() as u16;
            let col = area.x + area.width.saturating_sub(width) / 2;
            buf.set_stringn(col, row, banner.text, area.width as usize, style);
        }
    }
}

impl Widget for CelebrationOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.render_confetti(area, buf);
        self.render_fireworks(area, buf);
        self.render_banners(area, buf);
    }
}
