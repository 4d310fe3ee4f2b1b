//! Breakeven detection on a sampled P&L curve.

use super::payoff::{PnlCurve, PnlPoint};

/// Roots closer than this are reported once.
const ROOT_DEDUP_TOLERANCE: f64 = 1e-7;

/// P&L below this fraction of the curve's largest magnitude counts as zero.
const RELATIVE_ZERO: f64 = 1e-9;

/// Absolute P&L at or below which a sample of `curve` is treated as zero.
///
/// Offsetting legs leave rounding residue of order `1e-13` where the payoff
/// is nominally flat at zero; the tolerance scales with the position so that
/// residue never reads as a sign change.
#[must_use]
pub fn zero_tolerance(curve: &PnlCurve) -> f64 {
    let scale = curve
        .points
        .iter()
        .fold(1.0_f64, |scale, p| scale.max(p.pnl.abs()));
    RELATIVE_ZERO * scale
}

/// `pnl`, or exactly zero when within `tolerance` of it.
#[must_use]
pub fn snap_to_zero(pnl: f64, tolerance: f64) -> f64 {
    if pnl.abs() <= tolerance { 0.0 } else { pnl }
}

/// Underlying prices at which the curve's P&L crosses or touches zero,
/// ascending.
///
/// Samples within [`zero_tolerance`] of zero are roots; a run of them reports
/// its first and last price, except that an end of the run lying on the edge
/// of the sampled domain is not a breakeven (the flat stretch continues past
/// it). Adjacent samples of strictly opposite sign are interpolated linearly,
/// which is exact for at-expiration curves because strikes are always sampled.
#[must_use]
pub fn find_breakevens(curve: &PnlCurve) -> Vec<f64> {
    let tolerance = zero_tolerance(curve);
    let points: Vec<PnlPoint> = curve
        .points
        .iter()
        .map(|p| PnlPoint {
            price: p.price,
            pnl: snap_to_zero(p.pnl, tolerance),
        })
        .collect();
    let last = points.len().saturating_sub(1);
    let mut roots = Vec::new();

    let mut i = 0;
    while i < points.len() {
        if points[i].pnl == 0.0 {
            let start = i;
            while i < last && points[i + 1].pnl == 0.0 {
                i += 1;
            }
            if start == i {
                roots.push(points[i].price);
            } else {
                if start > 0 {
                    roots.push(points[start].price);
                }
                if i < last {
                    roots.push(points[i].price);
                }
            }
        } else if let Some(next) = points.get(i + 1) {
            if next.pnl != 0.0 && (points[i].pnl < 0.0) != (next.pnl < 0.0) {
                roots.push(interpolate_root(points[i], *next));
            }
        }
        i += 1;
    }

    roots.sort_by(f64::total_cmp);
    roots.dedup_by(|a, b| (*a - *b).abs() <= ROOT_DEDUP_TOLERANCE);
    roots
}

fn interpolate_root(a: PnlPoint, b: PnlPoint) -> f64 {
    let t = a.pnl / (a.pnl - b.pnl);
    (b.price - a.price).mul_add(t, a.price)
}
