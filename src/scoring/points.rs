/// Points awarded for places 1 through 8. Everything below 8th scores nothing.
pub const POINTS_TABLE: [f64; 8] = [10.0, 8.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];

/// Points for a single 1-based place
pub fn points_for_place(place: u32) -> f64 {
    match place {
        0 => 0.0,
        p => POINTS_TABLE.get(p as usize - 1).copied().unwrap_or(0.0),
    }
}

/// Points each competitor receives when `count` competitors tie starting at
/// `place`: the table values for the places the block occupies, split evenly.
pub fn split_points(place: u32, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let total: f64 = (0..count as u32).map(|i| points_for_place(place + i)).sum();
    total / count as f64
}
