use crate::bits;
use crate::constants::*;
use crate::mmu::Memory;

use super::{Ppu, Screen};

/// Shades for the four palette entries, lightest first.
const COLOR_MAP: [u8; 4] = [255, 170, 85, 0];
const OAM_BASE: u16 = 0xFE00;
const SPRITE_COUNT: u16 = 40;
const SPRITES_PER_LINE: usize = 10;

#[derive(Debug, Clone, Copy)]
struct Sprite {
    y: u8,
    x: u8,
    tile: u8,
    flags: u8,
}

impl Sprite {
    fn read(bus: &impl Memory, id: u16) -> Self {
        let base = OAM_BASE + id * 4;
        Self {
            y: bus.read_byte(base),
            x: bus.read_byte(base + 1),
            tile: bus.read_byte(base + 2),
            flags: bus.read_byte(base + 3),
        }
    }

    /// Screen row of the sprite's first line; OAM stores y + 16.
    fn top(&self) -> i16 {
        self.y as i16 - 16
    }
}

fn shade(palette: u8, color: u8) -> u8 {
    COLOR_MAP[((palette >> (color * 2)) & 0x03) as usize]
}

/// 2-bit color index of `bit` (7 = leftmost) from a tile row's two planes.
fn color_index(low: u8, high: u8, bit: u8) -> u8 {
    (((high >> bit) & 1) << 1) | ((low >> bit) & 1)
}

/// Color index at (x, y) of a 256x256 tile map.
fn map_pixel(bus: &impl Memory, map_base: u16, unsigned_tiles: bool, x: u8, y: u8) -> u8 {
    let tile_id = bus.read_byte(map_base + (y as u16 / 8) * 32 + x as u16 / 8);
    let tile_addr = if unsigned_tiles {
        0x8000 + tile_id as u16 * 16
    } else {
        0x9000_u16.wrapping_add_signed(tile_id as i8 as i16 * 16)
    };
    let row_addr = tile_addr + (y as u16 % 8) * 2;
    color_index(
        bus.read_byte(row_addr),
        bus.read_byte(row_addr + 1),
        7 - x % 8,
    )
}

impl<S: Screen> Ppu<S> {
    /// Renders scanline `ly` and hands it to the screen.
    pub(super) fn draw_line(&mut self, ly: u8, bus: &impl Memory) {
        if ly as usize >= SCREEN_HEIGHT {
            return;
        }
        let lcdc = bus.read_byte(LCDC_ADDR);

        self.bg_index.fill(0);
        if bits::bit(lcdc, 0) {
            self.draw_background(ly, lcdc, bus);
            if bits::bit(lcdc, 5) {
                self.draw_window(ly, lcdc, bus);
            }
        } else {
            self.line.fill(COLOR_MAP[0]);
        }

        if bits::bit(lcdc, 1) {
            self.draw_sprites(ly, lcdc, bus);
        }

        for (x, &pixel) in self.line.iter().enumerate() {
            self.screen.set_pixel(x, ly as usize, pixel);
        }
    }

    fn draw_background(&mut self, ly: u8, lcdc: u8, bus: &impl Memory) {
        let bgp = bus.read_byte(BGP_ADDR);
        let scx = bus.read_byte(SCX_ADDR);
        let scy = bus.read_byte(SCY_ADDR);
        let unsigned_tiles = bits::bit(lcdc, 4);
        let map_base = if bits::bit(lcdc, 3) { 0x9C00 } else { 0x9800 };

        let y = ly.wrapping_add(scy);
        for col in 0..SCREEN_WIDTH {
            let x = (col as u8).wrapping_add(scx);
            let color = map_pixel(bus, map_base, unsigned_tiles, x, y);
            self.bg_index[col] = color;
            self.line[col] = shade(bgp, color);
        }
    }

    fn draw_window(&mut self, ly: u8, lcdc: u8, bus: &impl Memory) {
        let wy = bus.read_byte(WY_ADDR);
        let wx = bus.read_byte(WX_ADDR);
        if wy > ly || wx > 166 {
            return;
        }
        let bgp = bus.read_byte(BGP_ADDR);
        let unsigned_tiles = bits::bit(lcdc, 4);
        let map_base = if bits::bit(lcdc, 6) { 0x9C00 } else { 0x9800 };

        // WX is stored plus 7.
        let start = wx as i16 - 7;
        let y = ly - wy;
        for col in start.max(0) as usize..SCREEN_WIDTH {
            let x = (col as i16 - start) as u8;
            let color = map_pixel(bus, map_base, unsigned_tiles, x, y);
            self.bg_index[col] = color;
            self.line[col] = shade(bgp, color);
        }
    }

    fn draw_sprites(&mut self, ly: u8, lcdc: u8, bus: &impl Memory) {
        let obp0 = bus.read_byte(OBP0_ADDR);
        let obp1 = bus.read_byte(OBP1_ADDR);
        let height: i16 = if bits::bit(lcdc, 2) { 16 } else { 8 };
        let line = ly as i16;

        let mut sprites: Vec<Sprite> = (0..SPRITE_COUNT)
            .map(|id| Sprite::read(bus, id))
            .filter(|s| line >= s.top() && line < s.top() + height)
            .collect();
        // Stable: equal x keeps table order.
        sprites.sort_by_key(|s| s.x);
        sprites.truncate(SPRITES_PER_LINE);

        // Reverse so the first sprite paints last and wins.
        for sprite in sprites.iter().rev() {
            let mut row = line - sprite.top();
            if bits::bit(sprite.flags, 6) {
                row = height - 1 - row;
            }
            let tile = if height == 16 {
                sprite.tile & 0xFE
            } else {
                sprite.tile
            };
            let row_addr = 0x8000 + tile as u16 * 16 + row as u16 * 2;
            let low = bus.read_byte(row_addr);
            let high = bus.read_byte(row_addr + 1);
            let palette = if bits::bit(sprite.flags, 4) { obp1 } else { obp0 };
            let behind_bg = bits::bit(sprite.flags, 7);

            for px in 0..8u8 {
                let screen_x = sprite.x as i16 - 8 + px as i16;
                if !(0..SCREEN_WIDTH as i16).contains(&screen_x) {
                    continue;
                }
                let screen_x = screen_x as usize;
                let bit = if bits::bit(sprite.flags, 5) { px } else { 7 - px };
                let color = color_index(low, high, bit);
                if color == 0 || (behind_bg && self.bg_index[screen_x] != 0) {
                    continue;
                }
                self.line[screen_x] = shade(palette, color);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_color_index_planes() {
        // low plane supplies bit 0, high plane bit 1
        assert_eq!(color_index(0b1000_0000, 0b0000_0000, 7), 1);
        assert_eq!(color_index(0b0000_0000, 0b1000_0000, 7), 2);
        assert_eq!(color_index(0b0000_0001, 0b0000_0001, 0), 3);
    }

    #[test]
    fn test_shade_through_palette() {
        // Identity palette 0b11_10_01_00
        assert_eq!(shade(0xE4, 0), 255);
        assert_eq!(shade(0xE4, 1), 170);
        assert_eq!(shade(0xE4, 2), 85);
        assert_eq!(shade(0xE4, 3), 0);
        // Inverted palette
        assert_eq!(shade(0x1B, 0), 0);
    }
}
