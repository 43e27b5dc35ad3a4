//! Pairing utilities: bracket sizing, bye placement, round robin schedule.

use crate::models::{Participant, ParticipantId, Slot};

/// Smallest power of two >= n (1 for n <= 1).
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Participants in draw priority: seeded ones by ascending seed, then the rest in enrollment order.
pub fn seed_order(participants: &[Participant]) -> Vec<&Participant> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    // sort_by_key is stable, so equal keys keep enrollment order.
    ordered.sort_by_key(|p| (p.seed.is_none(), p.seed.unwrap_or(0)));
    ordered
}

/// First-round node that the i-th bye goes to: alternate top and bottom of the draw.
fn bye_node(i: usize, nodes: usize) -> usize {
    if i % 2 == 0 {
        i / 2
    } else {
        nodes - 1 - i / 2
    }
}

/// Lay out the first round: `next_power_of_two(k)` slots, consecutive pairs forming one node.
///
/// 1. The first `s - k` participants in seed order each get a bye, placed at node 0, the last
///    node, node 1, the second-to-last node, and so on.
/// 2. The remaining participants fill the other nodes top to bottom, strongest against weakest.
///
/// Since `s - k < s / 2`, a node never holds two byes. Rosters under 2 are returned as-is.
pub fn assign_byes(participants: &[Participant]) -> Vec<Slot> {
    let k = participants.len();
    if k < 2 {
        return participants.iter().map(|p| Slot::Participant(p.id)).collect();
    }
    let size = next_power_of_two(k);
    let nodes = size / 2;
    let byes = size - k;
    let ordered = seed_order(participants);

    let mut slots = vec![Slot::Bye; size];
    let mut has_bye = vec![false; nodes];
    for (i, p) in ordered.iter().take(byes).enumerate() {
        let node = bye_node(i, nodes);
        slots[2 * node] = Slot::Participant(p.id);
        has_bye[node] = true;
    }

    let rest = &ordered[byes..];
    let mut pairs = (0..rest.len() / 2).map(|i| (rest[i].id, rest[rest.len() - 1 - i].id));
    for node in (0..nodes).filter(|&n| !has_bye[n]) {
        if let Some((top, bottom)) = pairs.next() {
            slots[2 * node] = Slot::Participant(top);
            slots[2 * node + 1] = Slot::Participant(bottom);
        }
    }
    slots
}

/// Every unordered pair exactly once, as `(round, player_1, player_2)`, using the circle method.
///
/// Odd rosters get a phantom entrant; whoever meets it rests that round and no pair is emitted.
pub fn generate_round_robin_fixtures(
    participants: &[Participant],
) -> Vec<(u32, ParticipantId, ParticipantId)> {
    let mut ring: Vec<Option<ParticipantId>> = participants.iter().map(|p| Some(p.id)).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let n = ring.len();
    if n < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    for round in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (ring[i], ring[n - 1 - i]) {
                pairs.push((round as u32, a, b));
            }
        }
        // First entrant stays fixed, everyone else rotates one place.
        ring[1..].rotate_right(1);
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn roster(n: usize) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(format!("P{i}"))).collect()
    }

    #[test]
    fn next_power_of_two_sizes() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
        assert_eq!(next_power_of_two(9), 16);
    }

    #[test]
    fn seeded_participants_come_first() {
        let mut players = roster(4);
        players[3].seed = Some(1);
        players[1].seed = Some(2);
        let ordered: Vec<_> = seed_order(&players).iter().map(|p| p.id).collect();
        assert_eq!(ordered, vec![players[3].id, players[1].id, players[0].id, players[2].id]);
    }

    #[test]
    fn byes_alternate_between_top_and_bottom() {
        let players = roster(5);
        let slots = assign_byes(&players);
        assert_eq!(slots.len(), 8);
        assert_eq!(slots.iter().filter(|s| s.is_bye()).count(), 3);

        // P0 top, P1 bottom, P2 second from top.
        assert_eq!(slots[0], Slot::Participant(players[0].id));
        assert_eq!(slots[1], Slot::Bye);
        assert_eq!(slots[6], Slot::Participant(players[1].id));
        assert_eq!(slots[7], Slot::Bye);
        assert_eq!(slots[2], Slot::Participant(players[2].id));
        assert_eq!(slots[3], Slot::Bye);
        assert_eq!(slots[4], Slot::Participant(players[3].id));
        assert_eq!(slots[5], Slot::Participant(players[4].id));
    }

    #[test]
    fn no_node_gets_two_byes() {
        for k in 2..40 {
            let slots = assign_byes(&roster(k));
            for pair in slots.chunks_exact(2) {
                assert!(!(pair[0].is_bye() && pair[1].is_bye()), "double bye for k={k}");
            }
            let placed: HashSet<_> = slots.iter().filter_map(|s| s.participant()).collect();
            assert_eq!(placed.len(), k);
        }
    }

    #[test]
    fn full_bracket_pairs_strongest_with_weakest() {
        let players = roster(4);
        let slots = assign_byes(&players);
        assert_eq!(
            slots,
            vec![
                Slot::Participant(players[0].id),
                Slot::Participant(players[3].id),
                Slot::Participant(players[1].id),
                Slot::Participant(players[2].id),
            ]
        );
    }

    #[test]
    fn round_robin_covers_every_pair_once() {
        for k in 2..12 {
            let players = roster(k);
            let pairs = generate_round_robin_fixtures(&players);
            assert_eq!(pairs.len(), k * (k - 1) / 2);
            let unique: HashSet<_> = pairs
                .iter()
                .map(|&(_, a, b)| if a < b { (a, b) } else { (b, a) })
                .collect();
            assert_eq!(unique.len(), pairs.len());
            assert!(pairs.iter().all(|&(_, a, b)| a != b));
        }
    }

    #[test]
    fn nobody_plays_twice_in_a_round() {
        let players = roster(7);
        let pairs = generate_round_robin_fixtures(&players);
        let rounds = pairs.iter().map(|p| p.0).max().unwrap_or(0) + 1;
        assert_eq!(rounds, 7);
        for round in 0..rounds {
            let mut seen = HashSet::new();
            for &(_, a, b) in pairs.iter().filter(|p| p.0 == round) {
                assert!(seen.insert(a));
                assert!(seen.insert(b));
            }
        }
    }
}
