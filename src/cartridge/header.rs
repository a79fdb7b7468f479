/*
Cartridge header fields consumed by the core.

Address Range,Name,Purpose
0x0104–0x0133,Logo,Bitmap the bootstrap image compares against its own copy.
0x0134–0x0143,Title,Uppercase ASCII, NUL padded.
0x0147,Cartridge Type,Selects the bank controller and whether external RAM exists.
0x0148,ROM Size,Bank count is 2 << code.
0x0149,RAM Size,External RAM size code.
0x014D,Header Checksum,Checksum of bytes 0134–014C.
*/

use log::warn;

use super::error::LoadError;

const HEADER_END: usize = 0x0150;

const LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    pub title: String,
    pub cart_type: u8,       // 0x0147
    pub rom_size_code: u8,   // 0x0148
    pub ram_size_code: u8,   // 0x0149
    pub checksum_header: u8, // 0x014D
    /// Logo and header checksum both matched.
    pub is_valid: bool,
}

impl Headers {
    pub fn parse(content: &[u8]) -> Result<Self, LoadError> {
        if content.len() < HEADER_END {
            return Err(LoadError::HeaderTooSmall(content.len()));
        }

        let mut headers = Self {
            title: extract_title(content),
            cart_type: content[0x0147],
            rom_size_code: content[0x0148],
            ram_size_code: content[0x0149],
            checksum_header: content[0x014D],
            is_valid: false,
        };
        headers.is_valid = headers.validate(content);
        Ok(headers)
    }

    /// A failed check is reported but not fatal; homebrew and test images
    /// often ship without a logo.
    fn validate(&self, content: &[u8]) -> bool {
        if content[0x0104..0x0134] != LOGO {
            warn!("Cartridge logo verification failed");
            return false;
        }

        let computed = header_checksum(content);
        if computed != self.checksum_header {
            warn!(
                "Header checksum mismatch! Calculated: {:02X}, Header: {:02X}",
                computed, self.checksum_header
            );
            return false;
        }
        true
    }

    pub fn rom_banks(&self) -> usize {
        2 << self.rom_size_code
    }
}

fn header_checksum(content: &[u8]) -> u8 {
    content[0x0134..=0x014C]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

fn extract_title(content: &[u8]) -> String {
    let title_bytes = &content[0x0134..=0x0143];
    let end = title_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(title_bytes.len());
    String::from_utf8_lossy(&title_bytes[..end]).into_owned()
}
