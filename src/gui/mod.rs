use cozy_chess::{Color, Piece, Square};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke};
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;

use crate::board::squares::{is_light, square_at};
use crate::config::Settings;
use crate::game::Game;
use crate::layout::BoardLayout;

pub mod sprites;

use sprites::{piece_letter, SpriteImages, Sprites};

const BACKGROUND: Color32 = Color32::from_rgb(129, 84, 56);
const LIGHT_SQUARE: Color32 = Color32::WHITE;
const PANEL: Color32 = Color32::from_rgb(110, 109, 103);
const PANEL_TEXT: Color32 = Color32::from_rgb(240, 240, 235);

pub struct ChessLabApp {
    game: Game,
    sprites: Option<Sprites>,
    keep_open: bool,
    flipped: bool,
    reported: bool,
    failed: bool,
    failure: Rc<RefCell<Option<String>>>,
}

impl ChessLabApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        game: Game,
        images: Option<SpriteImages>,
        settings: &Settings,
        failure: Rc<RefCell<Option<String>>>,
    ) -> Self {
        let sprites = images.map(|imgs| Sprites::upload(&cc.egui_ctx, imgs));
        Self::from_parts(game, sprites, settings, failure)
    }

    fn from_parts(game: Game, sprites: Option<Sprites>, settings: &Settings, failure: Rc<RefCell<Option<String>>>) -> Self {
        Self {
            game,
            sprites,
            keep_open: settings.keep_open,
            flipped: settings.flipped(),
            reported: false,
            failed: false,
            failure,
        }
    }

    fn layout(&self, ctx: &egui::Context) -> BoardLayout {
        let screen = ctx.screen_rect();
        BoardLayout::fit_width((screen.min.x, screen.min.y), screen.width(), self.flipped)
    }

    /// Game-over check and the machine's move. Returns false once the loop
    /// should stop taking input.
    fn advance(&mut self, ctx: &egui::Context) -> bool {
        // the close request takes effect a few frames later
        if self.failed { return false; }
        if let Some(outcome) = self.game.outcome() {
            if !self.reported {
                self.reported = true;
                self.game.cancel_grab();
                info!("game over: {}", outcome);
                if !self.keep_open { ctx.send_viewport_cmd(egui::ViewportCommand::Close); }
            }
            return false;
        }
        if let Err(e) = self.game.play_machine_turn() {
            error!("{}: {}", self.game.opponent_name(), e);
            self.failed = true;
            *self.failure.borrow_mut() = Some(format!("{}: {}", self.game.opponent_name(), e));
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return false;
        }
        true
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, layout: &BoardLayout) {
        let (pos, down) = ctx.input(|i| (i.pointer.latest_pos(), i.pointer.primary_down()));
        if down {
            self.game.press(pos.and_then(|p| layout.square_at(p.x, p.y)));
        } else if self.game.grab().is_some() {
            self.game.release(pos.and_then(|p| layout.drop_target(p.x, p.y)));
        }

        let hovering_piece = pos
            .and_then(|p| layout.square_at(p.x, p.y))
            .and_then(|sq| self.game.position().piece_at(sq))
            .is_some();
        let icon = if self.game.grab().is_some() {
            egui::CursorIcon::Grabbing
        } else if hovering_piece {
            egui::CursorIcon::Grab
        } else {
            egui::CursorIcon::Default
        };
        ctx.set_cursor_icon(icon);
    }

    fn draw(&self, painter: &egui::Painter, layout: &BoardLayout, screen: Rect, pointer: Option<Pos2>) {
        painter.rect_filled(screen, 0.0, BACKGROUND);

        for rank in 0..8 {
            for file in 0..8 {
                let Some(sq) = square_at(file, rank) else { continue };
                if !is_light(sq) { continue; }
                painter.rect_filled(square_rect(layout, sq), 0.0, LIGHT_SQUARE);
            }
        }

        let grab = self.game.grab();
        let snapshot = self.game.position().snapshot();
        for rank in 0..8 {
            for file in 0..8 {
                let Some(sq) = square_at(file, rank) else { continue };
                let Some((color, piece)) = snapshot.at(sq) else { continue };
                if grab.map(|g| g.origin) == Some(sq) { continue; }
                let (x, y, side) = layout.piece_rect(sq);
                self.draw_piece(painter, piece_rect(x, y, side), color, piece);
            }
        }

        if let (Some(g), Some(p)) = (grab, pointer) {
            let (x, y, side) = layout.piece_rect_at(p.x, p.y);
            self.draw_piece(painter, piece_rect(x, y, side), g.piece.0, g.piece.1);
        }

        let panel = Rect::from_min_max(egui::pos2(screen.min.x, layout.bottom()), screen.max);
        painter.rect_filled(panel, 0.0, PANEL);
        let font = FontId::proportional((layout.square * 0.3).max(12.0));
        let line_height = font.size * 1.5;
        for (i, line) in self.status_lines().iter().enumerate() {
            let at = egui::pos2(panel.min.x + layout.square * 0.25, panel.min.y + layout.square * 0.25 + i as f32 * line_height);
            painter.text(at, Align2::LEFT_TOP, line, font.clone(), PANEL_TEXT);
        }
    }

    fn draw_piece(&self, painter: &egui::Painter, rect: Rect, color: Color, piece: Piece) {
        if let Some(tex) = self.sprites.as_ref().and_then(|s| s.get(color, piece)) {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), rect, uv, Color32::WHITE);
            return;
        }
        // No sprite set configured: a disc with the piece letter.
        let (fill, ink) = match color {
            Color::White => (Color32::from_rgb(250, 248, 240), Color32::BLACK),
            Color::Black => (Color32::from_rgb(30, 30, 30), Color32::WHITE),
        };
        let radius = rect.width() * 0.45;
        painter.circle_filled(rect.center(), radius, fill);
        painter.circle_stroke(rect.center(), radius, Stroke::new((radius * 0.06).max(1.0), ink));
        painter.text(rect.center(), Align2::CENTER_CENTER, piece_letter(piece), FontId::proportional(radius * 1.1), ink);
    }

    fn status_lines(&self) -> Vec<String> {
        let pos = self.game.position();
        let mut lines = vec![format!("Playing {} as {}", self.game.opponent_name(), color_name(self.game.human()))];
        match self.game.outcome() {
            Some(outcome) => lines.push(format!("Game over: {}", outcome)),
            None => {
                let who = if self.game.is_human_turn() { "your move" } else { "thinking" };
                let check = if pos.is_check() { ", check" } else { "" };
                lines.push(format!("{} to move ({}{})", color_name(pos.side_to_move()), who, check));
            }
        }
        lines.push(format!("Ply {}   Last move {}", pos.ply(), self.game.last_move().unwrap_or("-")));
        lines
    }
}

impl eframe::App for ChessLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let layout = self.layout(ctx);
        if self.advance(ctx) {
            self.handle_pointer(ctx, &layout);
        }
        let pointer = ctx.input(|i| i.pointer.latest_pos());
        egui::CentralPanel::default().frame(egui::Frame::none()).show(ctx, |ui| {
            self.draw(ui.painter(), &layout, ctx.screen_rect(), pointer);
        });
        ctx.request_repaint();
    }
}

fn square_rect(layout: &BoardLayout, sq: Square) -> Rect {
    let (x, y) = layout.square_origin(sq);
    Rect::from_min_size(egui::pos2(x, y), egui::vec2(layout.square, layout.square))
}

fn piece_rect(x: f32, y: f32, side: f32) -> Rect { Rect::from_min_size(egui::pos2(x, y), egui::vec2(side, side)) }

fn color_name(c: Color) -> &'static str {
    match c { Color::White => "White", Color::Black => "Black" }
}

/// Opens the window and runs the frame loop until the game ends or the
/// window is closed. Engine failures during play come back as errors.
pub fn run(game: Game, images: Option<SpriteImages>, settings: &Settings) -> anyhow::Result<()> {
    let (width, height) = settings.window_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_resizable(false)
            .with_title("Chess Labs"),
        ..Default::default()
    };
    let failure = Rc::new(RefCell::new(None));
    let app_failure = Rc::clone(&failure);
    let settings = settings.clone();
    eframe::run_native(
        "Chess Labs",
        options,
        Box::new(move |cc| Box::new(ChessLabApp::new(cc, game, images, &settings, app_failure))),
    )
    .map_err(|e| anyhow::anyhow!("window: {e}"))?;
    if let Some(msg) = failure.borrow_mut().take() { anyhow::bail!("{}", msg); }
    Ok(())
}
