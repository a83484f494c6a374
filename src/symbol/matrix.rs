//! Module grid: function patterns, codeword placement, masking and the
//! mask penalty score.

use super::encoder::size_of;

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Format information bits of level M.
const ECL_BITS_M: u32 = 0b00;

/// Square grid of modules with a parallel map of function modules.
#[derive(Debug, Clone)]
pub(crate) struct Matrix {
    pub(crate) size: usize,
    pub(crate) modules: Vec<bool>,
    pub(crate) function: Vec<bool>,
    version: u8,
}

impl Matrix {
    /// Empty grid of `version` with every function pattern drawn and the
    /// format area reserved.
    pub(crate) fn new(version: u8) -> Self {
        let size = size_of(version);
        let mut matrix = Self {
            size,
            modules: vec![false; size * size],
            function: vec![false; size * size],
            version,
        };
        matrix.draw_function_patterns();
        matrix
    }

    pub(crate) fn get(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.size + x]
    }

    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        let i = y * self.size + x;
        self.modules[i] = dark;
        self.function[i] = true;
    }

    fn draw_function_patterns(&mut self) {
        let size = self.size;
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        self.draw_finder(3, 3);
        self.draw_finder(size as i32 - 4, 3);
        self.draw_finder(3, size as i32 - 4);

        let positions = self.alignment_positions();
        let n = positions.len();
        for (i, &x) in positions.iter().enumerate() {
            for (j, &y) in positions.iter().enumerate() {
                // The three corners occupied by finder patterns.
                let finder = (i == 0 && j == 0) || (i == 0 && j == n - 1) || (i == n - 1 && j == 0);
                if !finder {
                    self.draw_alignment(x, y);
                }
            }
        }

        self.draw_format_bits(0);
        self.draw_version();
    }

    fn draw_finder(&mut self, x: i32, y: i32) {
        let size = self.size as i32;
        for dy in -4..=4i32 {
            for dx in -4..=4i32 {
                let (xx, yy) = (x + dx, y + dy);
                if (0..size).contains(&xx) && (0..size).contains(&yy) {
                    let distance = dx.abs().max(dy.abs());
                    self.set_function(xx as usize, yy as usize, distance != 2 && distance != 4);
                }
            }
        }
    }

    fn draw_alignment(&mut self, x: usize, y: usize) {
        for dy in -2..=2i32 {
            for dx in -2..=2i32 {
                let xx = (x as i32 + dx) as usize;
                let yy = (y as i32 + dy) as usize;
                self.set_function(xx, yy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Centre coordinates of alignment patterns, ascending.
    pub(crate) fn alignment_positions(&self) -> Vec<usize> {
        if self.version == 1 {
            return Vec::new();
        }
        let v = usize::from(self.version);
        let count = v / 7 + 2;
        let step = (v * 8 + count * 3 + 5) / (count * 4 - 4) * 2;
        let mut result: Vec<usize> = (0..count - 1).map(|i| self.size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    /// Both copies of the 15-bit format information for `mask`, plus the
    /// always-dark module.
    pub(crate) fn draw_format_bits(&mut self, mask: u8) {
        let bits = format_bits(mask);
        let bit = |i: usize| (bits >> i) & 1 != 0;
        let size = self.size;

        for i in 0..6 {
            self.set_function(8, i, bit(i));
        }
        self.set_function(8, 7, bit(6));
        self.set_function(8, 8, bit(7));
        self.set_function(7, 8, bit(8));
        for i in 9..15 {
            self.set_function(14 - i, 8, bit(i));
        }

        for i in 0..8 {
            self.set_function(size - 1 - i, 8, bit(i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, bit(i));
        }
        self.set_function(8, size - 8, true);
    }

    fn draw_version(&mut self) {
        if self.version < 7 {
            return;
        }
        let bits = version_bits(self.version);
        for i in 0..18 {
            let dark = (bits >> i) & 1 != 0;
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, dark);
            self.set_function(b, a, dark);
        }
    }

    /// Place the final codewords in the zigzag order, skipping function
    /// modules. Remainder bits stay light.
    pub(crate) fn draw_codewords(&mut self, codewords: &[u8]) {
        let size = self.size;
        let total_bits = codewords.len() * 8;
        let mut i = 0;
        let mut right = size as i32 - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..size {
                for j in 0..2 {
                    let x = right as usize - j;
                    let y = if upward { size - 1 - vert } else { vert };
                    let index = y * size + x;
                    if !self.function[index] && i < total_bits {
                        self.modules[index] = (codewords[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
    }

    /// XOR the data area with mask pattern `mask` (its own inverse).
    pub(crate) fn apply_mask(&mut self, mask: u8) {
        let size = self.size;
        for y in 0..size {
            for x in 0..size {
                let invert = match mask {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => x * y % 2 + x * y % 3 == 0,
                    6 => (x * y % 2 + x * y % 3) % 2 == 0,
                    _ => ((x + y) % 2 + x * y % 3) % 2 == 0,
                };
                let index = y * size + x;
                if invert && !self.function[index] {
                    self.modules[index] = !self.modules[index];
                }
            }
        }
    }

    /// Penalty score of the current grid (lower is better).
    pub(crate) fn penalty(&self) -> i32 {
        let size = self.size;
        let mut result = 0;

        // Runs and finder-like patterns, rows then columns.
        for horizontal in [true, false] {
            for a in 0..size {
                let mut run_color = false;
                let mut run = 0;
                let mut history = FinderHistory::new(size);
                for b in 0..size {
                    let dark = if horizontal { self.get(b, a) } else { self.get(a, b) };
                    if dark == run_color {
                        run += 1;
                        if run == 5 {
                            result += PENALTY_N1;
                        } else if run > 5 {
                            result += 1;
                        }
                    } else {
                        history.add(run);
                        if !run_color {
                            result += history.count_patterns() * PENALTY_N3;
                        }
                        run_color = dark;
                        run = 1;
                    }
                }
                result += history.terminate_and_count(run_color, run) * PENALTY_N3;
            }
        }

        // 2x2 blocks of one colour.
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let c = self.get(x, y);
                if c == self.get(x + 1, y) && c == self.get(x, y + 1) && c == self.get(x + 1, y + 1) {
                    result += PENALTY_N2;
                }
            }
        }

        // Dark/light balance.
        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = (size * size) as i32;
        let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;

        result
    }
}

/// Run lengths of the last seven runs, newest first, for detecting the
/// 1:1:3:1:1 finder-like pattern with light borders.
struct FinderHistory {
    runs: [i32; 7],
    size: i32,
}

impl FinderHistory {
    fn new(size: usize) -> Self {
        Self {
            runs: [0; 7],
            size: size as i32,
        }
    }

    fn add(&mut self, mut run: i32) {
        if self.runs[0] == 0 {
            // Light border before the first run.
            run += self.size;
        }
        self.runs.copy_within(0..6, 1);
        self.runs[0] = run;
    }

    fn count_patterns(&self) -> i32 {
        let h = &self.runs;
        let n = h[1];
        let core = n > 0 && h[2] == n && h[3] == n * 3 && h[4] == n && h[5] == n;
        i32::from(core && h[0] >= n * 4 && h[6] >= n) + i32::from(core && h[6] >= n * 4 && h[0] >= n)
    }

    fn terminate_and_count(&mut self, run_color: bool, mut run: i32) -> i32 {
        if run_color {
            self.add(run);
            run = 0;
        }
        run += self.size;
        self.add(run);
        self.count_patterns()
    }
}

/// 15-bit format information for level M and `mask`: BCH(15,5) with
/// generator 0x537, XORed with 0x5412.
pub(crate) fn format_bits(mask: u8) -> u32 {
    let data = (ECL_BITS_M << 3) | u32::from(mask);
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    ((data << 10) | rem) ^ 0x5412
}

/// 18-bit version information: BCH(18,6) with generator 0x1F25.
pub(crate) fn version_bits(version: u8) -> u32 {
    let data = u32::from(version);
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    (data << 12) | rem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_information() {
        assert_eq!(format_bits(0), 0x5412);
        assert_eq!(format_bits(0), 0b101010000010010);
    }

    #[test]
    fn version_information() {
        assert_eq!(version_bits(7), 0x07C94);
    }

    #[test]
    fn alignment_pattern_positions() {
        assert!(Matrix::new(1).alignment_positions().is_empty());
        assert_eq!(Matrix::new(2).alignment_positions(), [6, 18]);
        assert_eq!(Matrix::new(7).alignment_positions(), [6, 22, 38]);
        assert_eq!(Matrix::new(15).alignment_positions(), [6, 26, 48, 70]);
        assert_eq!(Matrix::new(25).alignment_positions(), [6, 32, 58, 84, 110]);
    }

    #[test]
    fn finder_and_timing_patterns() {
        let m = Matrix::new(1);
        assert!(m.get(0, 0));
        assert!(!m.get(1, 1));
        assert!(m.get(3, 3));
        assert!(!m.get(7, 0));
        assert!(m.get(8, 6));
        assert!(!m.get(9, 6));
        // Dark module.
        assert!(m.get(8, m.size - 8));
    }

    #[test]
    fn function_module_count_matches_capacity() {
        for version in [1, 2, 6, 7, 15, 25] {
            let m = Matrix::new(version);
            let free = m.function.iter().filter(|&&f| !f).count();
            assert_eq!(free, super::super::encoder::raw_data_modules(version), "v{version}");
        }
    }

    #[test]
    fn mask_is_an_involution() {
        let mut m = Matrix::new(3);
        let before = m.modules.clone();
        m.apply_mask(5);
        assert_ne!(m.modules, before);
        m.apply_mask(5);
        assert_eq!(m.modules, before);
    }
}
