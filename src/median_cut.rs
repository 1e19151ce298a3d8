extern crate alloc;
use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

use rgb::RGB;

/// A box narrower than this on every axis is not worth splitting further.
const MIN_SPLITTABLE_EXTENT: u8 = 8;

/// An axis-aligned RGB-space box owning the pixels that fall inside it.
///
/// `rank = total * volume` decides which box splits next: large, spread-out
/// boxes first. `seq` is a monotone creation counter so that equal ranks pop
/// in a deterministic order.
#[derive(Debug, Clone)]
struct ColorBox {
    /// Inclusive [min, max] per channel, r/g/b order.
    range: [[u8; 2]; 3],
    pixels: Vec<RGB<u8>>,
    rank: u64,
    seq: u64,
}

impl ColorBox {
    fn new(range: [[u8; 2]; 3], pixels: Vec<RGB<u8>>, seq: u64) -> Self {
        let volume: u64 = range
            .iter()
            .map(|[min, max]| u64::from(max - min) + 1)
            .product();
        let rank = pixels.len() as u64 * volume;
        Self {
            range,
            pixels,
            rank,
            seq,
        }
    }

    fn total(&self) -> usize {
        self.pixels.len()
    }

    /// Widest channel, first wins on ties. `None` when every extent is at or
    /// below the split threshold.
    fn cut_axis(&self) -> Option<usize> {
        let extents = self.range.map(|[min, max]| max - min);
        let widest = extents.into_iter().max().unwrap_or(0);
        let axis = extents.iter().position(|&e| e == widest)?;
        (widest > MIN_SPLITTABLE_EXTENT).then_some(axis)
    }

    /// Split at the per-axis median into (low, high) children replacing this
    /// box. `None` when the box is unsplittable.
    fn split(&self, seq: &mut u64) -> Option<(ColorBox, ColorBox)> {
        let axis = self.cut_axis()?;

        let mut values: Vec<u8> = self.pixels.iter().map(|px| channel(px, axis)).collect();
        values.sort_unstable();
        let mut median = median_value(&values);
        // A median on the lower bound would leave one child with zero width.
        if median == self.range[axis][0] {
            median += 1;
        }

        let (mut low_pixels, mut high_pixels) = (Vec::new(), Vec::new());
        for &px in &self.pixels {
            if channel(&px, axis) < median {
                low_pixels.push(px);
            } else {
                high_pixels.push(px);
            }
        }

        let mut low_range = self.range;
        low_range[axis][1] = median;
        let mut high_range = self.range;
        high_range[axis][0] = median;

        *seq += 1;
        let low = ColorBox::new(low_range, low_pixels, *seq);
        *seq += 1;
        let high = ColorBox::new(high_range, high_pixels, *seq);
        Some((low, high))
    }
}

impl PartialEq for ColorBox {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for ColorBox {}

impl PartialOrd for ColorBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColorBox {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on rank; earlier-created box wins ties.
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn channel(px: &RGB<u8>, axis: usize) -> u8 {
    match axis {
        0 => px.r,
        1 => px.g,
        _ => px.b,
    }
}

/// Median of an already-sorted value list: floor-average of the two middle
/// values for even counts, exact middle value for odd.
fn median_value(sorted: &[u8]) -> u8 {
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        ((u16::from(sorted[middle - 1]) + u16::from(sorted[middle])) / 2) as u8
    } else {
        sorted[middle]
    }
}

/// Bounding box of the observed per-channel ranges. Full scan; pixel order is
/// irrelevant here.
fn color_range(pixels: &[RGB<u8>]) -> [[u8; 2]; 3] {
    let mut range = [[255u8, 0u8]; 3];
    for px in pixels {
        for (axis, bounds) in range.iter_mut().enumerate() {
            let v = channel(px, axis);
            bounds[0] = bounds[0].min(v);
            bounds[1] = bounds[1].max(v);
        }
    }
    range
}

/// Truncated-integer mean per channel; an empty box is black.
fn average(pixels: &[RGB<u8>]) -> [u8; 3] {
    if pixels.is_empty() {
        return [0, 0, 0];
    }
    let mut sums = [0u64; 3];
    for px in pixels {
        sums[0] += u64::from(px.r);
        sums[1] += u64::from(px.g);
        sums[2] += u64::from(px.b);
    }
    sums.map(|s| (s / pixels.len() as u64) as u8)
}

/// Median-cut quantization: refine a work set of color boxes up to `cut_time`
/// boxes, then rank by pixel count and keep the `result_num` heaviest.
///
/// Returns (mean color, pixel count) pairs, descending by count.
pub fn median_cut(pixels: Vec<RGB<u8>>, cut_time: usize, result_num: usize) -> Vec<([u8; 3], usize)> {
    let mut seq = 0u64;
    let mut queue = BinaryHeap::new();
    queue.push(ColorBox::new(color_range(&pixels), pixels, seq));

    while queue.len() < cut_time {
        let Some(top) = queue.pop() else { break };
        match top.split(&mut seq) {
            Some((low, high)) => {
                queue.push(low);
                queue.push(high);
            }
            None => {
                // The best remaining candidate is unsplittable; nothing
                // lower-ranked will split any better.
                queue.push(top);
                break;
            }
        }
    }

    let mut boxes = queue.into_vec();
    boxes.sort_by(|a, b| b.total().cmp(&a.total()).then_with(|| a.seq.cmp(&b.seq)));
    boxes
        .into_iter()
        .take(result_num)
        .map(|cb| (average(&cb.pixels), cb.total()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn px(r: u8, g: u8, b: u8) -> RGB<u8> {
        RGB { r, g, b }
    }

    #[test]
    fn median_of_odd_count_is_middle_value() {
        assert_eq!(median_value(&[1, 5, 9]), 5);
    }

    #[test]
    fn median_of_even_count_is_floor_average() {
        assert_eq!(median_value(&[1, 4, 7, 8]), 5);
        assert_eq!(median_value(&[0, 3]), 1);
    }

    #[test]
    fn color_range_covers_all_pixels() {
        let pixels = vec![px(10, 200, 50), px(90, 40, 220)];
        assert_eq!(color_range(&pixels), [[10, 90], [40, 200], [50, 220]]);
    }

    #[test]
    fn average_of_empty_box_is_black() {
        assert_eq!(average(&[]), [0, 0, 0]);
    }

    #[test]
    fn average_truncates_per_channel() {
        let pixels = vec![px(0, 0, 1), px(1, 0, 2)];
        assert_eq!(average(&pixels), [0, 0, 1]);
    }

    #[test]
    fn split_children_stay_within_parent_range() {
        let mut seq = 0u64;
        let pixels: Vec<_> = (0u8..=200).step_by(10).map(|v| px(v, 100, 100)).collect();
        let parent = ColorBox::new(color_range(&pixels), pixels, seq);
        let range = parent.range;
        let (low, high) = parent.split(&mut seq).unwrap();

        for (cb, side) in [(&low, "low"), (&high, "high")] {
            for p in &cb.pixels {
                for axis in 0..3 {
                    let v = channel(p, axis);
                    assert!(
                        cb.range[axis][0] <= v && v <= cb.range[axis][1],
                        "{side} child pixel {p:?} outside range on axis {axis}"
                    );
                }
            }
            assert!(cb.range[0][0] >= range[0][0] && cb.range[0][1] <= range[0][1]);
        }
        // Low child owns strictly-below-median pixels, high child the rest.
        let median = low.range[0][1];
        assert!(low.pixels.iter().all(|p| p.r < median));
        assert!(high.pixels.iter().all(|p| p.r >= median));
    }

    #[test]
    fn narrow_box_is_unsplittable() {
        let mut seq = 0u64;
        let pixels = vec![px(100, 100, 100), px(104, 103, 102), px(108, 100, 101)];
        let parent = ColorBox::new(color_range(&pixels), pixels, seq);
        assert!(parent.split(&mut seq).is_none());
    }

    #[test]
    fn two_distinct_pixels_split_into_singleton_boxes() {
        let pixels = vec![px(255, 0, 0), px(0, 255, 0)];
        let result = median_cut(pixels, 2, 5);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|&(_, count)| count == 1));
        let colors: Vec<_> = result.iter().map(|&(rgb, _)| rgb).collect();
        assert!(colors.contains(&[255, 0, 0]));
        assert!(colors.contains(&[0, 255, 0]));
    }

    #[test]
    fn no_pixel_lost_or_duplicated() {
        let pixels: Vec<_> = (0..300)
            .map(|i| px((i % 256) as u8, (i * 7 % 256) as u8, (i * 13 % 256) as u8))
            .collect();
        let n = pixels.len();
        let result = median_cut(pixels, 8, usize::MAX);
        let total: usize = result.iter().map(|&(_, count)| count).sum();
        assert_eq!(total, n);
    }

    #[test]
    fn uniform_image_stops_at_one_box() {
        let pixels = vec![px(100, 100, 100); 50];
        let result = median_cut(pixels, 16, 5);
        assert_eq!(result, vec![([100, 100, 100], 50)]);
    }

    #[test]
    fn ranking_is_by_pixel_count_descending() {
        // Two clusters of different weight, far apart on the red axis.
        let mut pixels = vec![px(20, 128, 128); 30];
        pixels.extend(vec![px(220, 128, 128); 70]);
        let result = median_cut(pixels, 2, 5);
        assert_eq!(result.len(), 2);
        assert!(result[0].1 >= result[1].1);
        assert_eq!(result[0].1, 70);
    }

    #[test]
    fn deterministic_across_runs() {
        let pixels: Vec<_> = (0..500)
            .map(|i| px((i * 3 % 256) as u8, (i * 5 % 256) as u8, (i * 11 % 256) as u8))
            .collect();
        let a = median_cut(pixels.clone(), 16, 5);
        let b = median_cut(pixels, 16, 5);
        assert_eq!(a, b);
    }
}
