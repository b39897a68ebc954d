//! Classification of matrix cells into finder ("eye") and data regions.

/// Side of each finder block, including its separator.
pub const EYE_BLOCK: usize = 9;

/// Which structural region a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Eye,
    Data,
}

/// Returns true if column `x`, row `y` of an `n`×`n` grid lies inside one of
/// the three finder blocks.
///
/// The blocks are `[0,9)×[0,9)`, `[n-8,n)×[0,9)` and `[0,9)×[n-8,n)`, clipped
/// to the grid.
pub fn is_eye_region(x: usize, y: usize, n: usize) -> bool {
    if x >= n || y >= n {
        return false;
    }
    let far = n.saturating_sub(EYE_BLOCK - 1);
    let near_x = x < EYE_BLOCK;
    let near_y = y < EYE_BLOCK;
    (near_x && near_y) || (x >= far && near_y) || (near_x && y >= far)
}

pub fn classify(x: usize, y: usize, n: usize) -> Region {
    if is_eye_region(x, y, n) {
        Region::Eye
    } else {
        Region::Data
    }
}
