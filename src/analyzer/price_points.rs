use crate::analyzer::intersection::find_intersection;
use crate::model::{Curve, PricePoint, PricePoints};

/// Curve pairs whose crossings define OPP, IPP, PMC and PME, in that order.
pub const OPP_CURVES: (Curve, Curve) = (Curve::TooCheap, Curve::NotExpensive);
pub const IPP_CURVES: (Curve, Curve) = (Curve::NotCheap, Curve::Expensive);
pub const PMC_CURVES: (Curve, Curve) = (Curve::TooCheap, Curve::Expensive);
pub const PME_CURVES: (Curve, Curve) = (Curve::NotCheap, Curve::NotExpensive);

pub fn resolve_price_points(series: &[PricePoint]) -> PricePoints {
    let cross = |(a, b): (Curve, Curve)| find_intersection(series, a, b);
    PricePoints {
        opp: cross(OPP_CURVES),
        ipp: cross(IPP_CURVES),
        pmc: cross(PMC_CURVES),
        pme: cross(PME_CURVES),
    }
}
