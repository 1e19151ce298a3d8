extern crate alloc;
use alloc::vec::Vec;

use rgb::RGB;

/// Filter an interleaved RGBA byte buffer down to the RGB samples worth
/// clustering, preserving scan order.
///
/// A pixel is kept iff it is neither uniformly near-white (`min(r,g,b) >= hi`)
/// nor uniformly near-black (`max(r,g,b) <= lo`) and its alpha is at least
/// `alpha_min`. Alpha is only an inclusion gate; it never reaches the engines.
///
/// The caller validates buffer length and range orientation up front, so this
/// is a pure transform over `chunks_exact(4)`.
pub fn filter_pixels(buffer: &[u8], filter_range: (u8, u8), alpha_min: u8) -> Vec<RGB<u8>> {
    let (lo, hi) = filter_range;
    let mut pixels = Vec::with_capacity(buffer.len() / 4);

    for px in buffer.chunks_exact(4) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        let min = r.min(g).min(b);
        let max = r.max(g).max(b);
        if !(min >= hi || max <= lo) && a >= alpha_min {
            pixels.push(RGB { r, g, b });
        }
    }

    pixels
}
