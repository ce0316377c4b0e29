use cozy_chess::{Color, Piece};
use eframe::egui;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("missing asset {0}")]
    Missing(PathBuf),
    #[error("cannot decode {path}: {source}")]
    Decode { path: PathBuf, source: image::ImageError },
}

/// `wK.png`, `bN.png`, ...
pub fn sprite_file_name(color: Color, piece: Piece) -> String {
    let c = match color { Color::White => 'w', Color::Black => 'b' };
    format!("{}{}.png", c, piece_letter(piece))
}

pub fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// Decoded piece images, read once at startup before the window exists.
pub struct SpriteImages {
    images: Vec<((Color, Piece), egui::ColorImage)>,
}

impl SpriteImages {
    /// Every one of the twelve sprites must be present and decodable.
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let mut images = Vec::with_capacity(12);
        for &color in &Color::ALL {
            for &piece in &Piece::ALL {
                let path = dir.join(sprite_file_name(color, piece));
                if !path.is_file() { return Err(AssetError::Missing(path)); }
                let rgba = image::open(&path).map_err(|source| AssetError::Decode { path: path.clone(), source })?.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                images.push(((color, piece), egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())));
            }
        }
        info!("loaded {} sprites from {}", images.len(), dir.display());
        Ok(Self { images })
    }

    pub fn image(&self, color: Color, piece: Piece) -> Option<&egui::ColorImage> {
        self.images.iter().find(|(key, _)| *key == (color, piece)).map(|(_, img)| img)
    }
}

/// Sprites uploaded as textures.
pub struct Sprites {
    textures: HashMap<(Color, Piece), egui::TextureHandle>,
}

impl Sprites {
    pub fn upload(ctx: &egui::Context, images: SpriteImages) -> Self {
        let textures = images
            .images
            .into_iter()
            .map(|(key, img)| {
                let name = sprite_file_name(key.0, key.1);
                (key, ctx.load_texture(name, img, egui::TextureOptions::LINEAR))
            })
            .collect();
        Self { textures }
    }

    pub fn get(&self, color: Color, piece: Piece) -> Option<&egui::TextureHandle> { self.textures.get(&(color, piece)) }
}
