//! Greedy scanline packing of equal-sized tags
//!
//! Every tag is tried unrotated first, then rotated 90°. Candidate top-left
//! corners are scanned row-major (y outer, x inner) with a step of
//! `min(10, extent)`. The first candidate whose footprint, grown by the
//! spacing, misses every previously accepted (also grown) footprint wins.
//! Packing stops at the first tag that fits nowhere; earlier tags are never
//! moved.

/// Coarse scan step in pixels
const SCAN_STEP: u32 = 10;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either side is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The same size turned 90°
    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, saturating at `u32::MAX`
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Half-open intersection test; touching edges do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || self.right() <= other.x
            || self.y >= other.bottom()
            || self.bottom() <= other.y)
    }
}

/// Position, size and rotation of one packed tag
///
/// Coordinates are relative to the top-left of the usable page area.
/// `width`/`height` are the on-page footprint, already swapped when rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
}

impl Placement {
    /// On-page footprint
    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Footprint grown right and down by `spacing`
    pub fn padded(&self, spacing: u32) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width.saturating_add(spacing),
            self.height.saturating_add(spacing),
        )
    }
}

/// Pack up to `target` tags of size `tag` into `area`
///
/// Returns the longest prefix that fits; may be empty.
pub fn pack(tag: Size, area: Size, target: usize, spacing: u32) -> Vec<Placement> {
    let mut placements = Vec::new();
    if tag.is_empty() {
        return placements;
    }

    let orientations = [(tag, false), (tag.transposed(), true)];
    let mut used: Vec<Rect> = Vec::new();

    for _ in 0..target {
        let found = orientations.iter().find_map(|&(size, rotated)| {
            find_position(size, area, spacing, &used).map(|(x, y)| Placement {
                x,
                y,
                width: size.width,
                height: size.height,
                rotated,
            })
        });

        match found {
            Some(placement) => {
                used.push(placement.padded(spacing));
                placements.push(placement);
            }
            None => break,
        }
    }

    placements
}

/// Pack one page, forcing a single unrotated tag at the origin when nothing fits
///
/// Guarantees progress for callers that page until every tag is placed.
pub fn pack_page(tag: Size, area: Size, target: usize, spacing: u32) -> Vec<Placement> {
    if target == 0 {
        return Vec::new();
    }

    let placements = pack(tag, area, target, spacing);
    if !placements.is_empty() {
        return placements;
    }

    log::debug!(
        "tag {}x{} does not fit in {}x{}, forcing one placement",
        tag.width,
        tag.height,
        area.width,
        area.height
    );
    vec![Placement {
        x: 0,
        y: 0,
        width: tag.width,
        height: tag.height,
        rotated: false,
    }]
}

/// First free top-left corner for a `size` tag, in scan order
fn find_position(size: Size, area: Size, spacing: u32, used: &[Rect]) -> Option<(u32, u32)> {
    if size.width > area.width || size.height > area.height {
        return None;
    }

    let step_x = size.width.min(SCAN_STEP);
    let step_y = size.height.min(SCAN_STEP);

    let mut y = 0;
    while y + size.height <= area.height {
        let mut x = 0;
        while x + size.width <= area.width {
            let candidate = Rect::new(x, y, size.width + spacing, size.height + spacing);
            match used.iter().find(|r| r.intersects(&candidate)) {
                None => return Some((x, y)),
                // Every scan position left of the blocker's right edge hits it too
                Some(blocker) => x = next_step(blocker.right(), step_x),
            }
        }
        y += step_y;
    }

    None
}

/// Smallest multiple of `step` that is >= `value`
fn next_step(value: u32, step: u32) -> u32 {
    value.div_ceil(step) * step
}
