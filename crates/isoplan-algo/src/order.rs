use crate::error::{Error, Result};
use crate::surface::{RenderOrder, SurfaceId, SurfaceSet};
use isoplan_core::model::RenderMode;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOrder {
    pub order: Vec<SurfaceId>,
    pub unresolved: Vec<SurfaceId>,
}

impl DrawOrder {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Order `ids` back to front. Each round paints, among the surfaces no other
/// remaining surface must precede, the one with the fewest undetermined
/// relations. Fast mode returns `ids` untouched.
pub fn sort_surfaces(
    set: &mut SurfaceSet,
    ids: &[SurfaceId],
    mode: RenderMode,
) -> Result<Vec<SurfaceId>> {
    if let Some(&bad) = ids.iter().find(|id| !set.contains(**id)) {
        return Err(Error::UnknownSurface(bad));
    }
    if mode.is_fast() {
        return Ok(ids.to_vec());
    }

    let mut remaining = ids.to_vec();
    let mut ordered = Vec::with_capacity(ids.len());

    while !remaining.is_empty() {
        set.count_round();

        // (position in `remaining`, undetermined count); first minimum wins.
        let mut best: Option<(usize, usize)> = None;
        for (pos, &candidate) in remaining.iter().enumerate() {
            let Some(undetermined) = eligibility(set, candidate, &remaining)? else {
                continue;
            };
            if best.map_or(true, |(_, fewest)| undetermined < fewest) {
                best = Some((pos, undetermined));
            }
        }

        let Some((pos, _)) = best else {
            return Err(Error::OrderingDeadlock { ordered, remaining });
        };
        ordered.push(remaining.remove(pos));
    }

    Ok(ordered)
}

/// Like [`sort_surfaces`], but a deadlock keeps what was ordered and appends
/// the rest in input order so the frame can still be painted.
pub fn draw_order(set: &mut SurfaceSet, ids: &[SurfaceId], mode: RenderMode) -> Result<DrawOrder> {
    match sort_surfaces(set, ids, mode) {
        Ok(order) => Ok(DrawOrder {
            order,
            unresolved: Vec::new(),
        }),
        Err(Error::OrderingDeadlock {
            mut ordered,
            remaining,
        }) => {
            tracing::error!(
                ordered = ordered.len(),
                remaining = ?remaining,
                "no eligible surface left; painting the rest in input order"
            );
            let unresolved: Vec<SurfaceId> = ids
                .iter()
                .copied()
                .filter(|id| remaining.contains(id))
                .collect();
            ordered.extend(unresolved.iter().copied());
            Ok(DrawOrder {
                order: ordered,
                unresolved,
            })
        }
        Err(err) => Err(err),
    }
}

fn eligibility(
    set: &mut SurfaceSet,
    candidate: SurfaceId,
    remaining: &[SurfaceId],
) -> Result<Option<usize>> {
    let mut undetermined = 0;
    for &other in remaining {
        if other == candidate {
            continue;
        }
        match set.is_rendered_before(candidate, other)? {
            RenderOrder::Before => {}
            RenderOrder::After => return Ok(None),
            RenderOrder::Undetermined => undetermined += 1,
        }
    }
    Ok(Some(undetermined))
}
