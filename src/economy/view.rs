//! Display helpers: number formatting and the region breadcrumb.

use super::logic::{region_breadcrumb, Breadcrumb};
use super::state::EngineState;
use super::catalog::region_template;

/// Earth's land and sea surface in m², the denominator of "ownership".
pub const EARTH_SURFACE_M2: f64 = 148_940_000_000_000.0;

/// 1234 → "1.2K", 5_600_000 → "5.6M", 999.9 → "999".
pub fn format_number(n: f64) -> String {
    if n >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{}", n.floor())
    }
}

/// Earon balance: scientific from one million, whole numbers without
/// decimals, everything else with two.
pub fn format_credits(n: f64) -> String {
    if n >= 1e6 {
        return format_exponential(n);
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}

/// Two-digit mantissa with an explicitly signed exponent: "1.23e+6".
fn format_exponential(n: f64) -> String {
    let s = format!("{:.2e}", n);
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// Prices: "1.50M", "2.00K", "12.34", "0.0001".
pub fn format_cost(cost: f64) -> String {
    if cost >= 1e6 {
        format!("{:.2}M", cost / 1e6)
    } else if cost >= 1e3 {
        format!("{:.2}K", cost / 1e3)
    } else if cost >= 1.0 {
        format!("{:.2}", cost)
    } else {
        format!("{:.4}", cost)
    }
}

/// 45 → "45s", 125 → "2m 5s", 3_780 → "1h 3m".
pub fn format_time(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m {}s", minutes, seconds % 60);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Area in m², switching to km² from one million.
pub fn format_area(square_meters: f64) -> String {
    if square_meters >= 1e6 {
        format!("{:.1} km²", square_meters / 1e6)
    } else {
        format!("{} m²", format_number(square_meters))
    }
}

pub fn earth_ownership_percent(state: &EngineState) -> f64 {
    state.total_area_owned / EARTH_SURFACE_M2 * 100.0
}

/// "Coconut Island • Area 1 • Zone 1"
pub fn format_breadcrumb(crumb: &Breadcrumb) -> String {
    let name = region_template(crumb.region_id)
        .map(|t| t.name)
        .unwrap_or("Unknown Region");
    format!("{} • Area {} • Zone {}", name, crumb.area, crumb.zone)
}

pub fn current_breadcrumb(state: &EngineState) -> String {
    format_breadcrumb(&region_breadcrumb(state))
}
