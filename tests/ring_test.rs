use rand::Rng;
use ringstore_rs::{
    ring::{
        locator::{ReplicaRole, REPLICATION_FACTOR},
        ring_position, HashRing, RingChange,
    },
    types::{Address, Member, RingPosition, RingSize},
};

fn member(address: &str, position: u64) -> Member {
    Member::with_position(Address::from(address), RingPosition::new(position))
}

fn addresses(members: &[Member]) -> Vec<String> {
    members.iter().map(|member| member.address().to_string()).collect()
}

// A@10, B@40, C@70 in a ring of size 100, seen from B.
fn three_member_ring() -> HashRing {
    HashRing::from_members(
        Address::from("B"),
        RingSize::new(100),
        vec![member("C", 70), member("A", 10), member("B", 40)],
    )
}

#[test]
fn ring_position_is_deterministic_and_in_range() {
    let ring_size = RingSize::new(512);
    for key in ["alpha", "beta", "gamma", "", "a much longer key than the others"] {
        let position = ring_position(key.as_bytes(), ring_size);
        assert_eq!(position, ring_position(key.as_bytes(), ring_size));
        assert!(position.int() < ring_size.int());
    }

    // A ring of size 1 (or a degenerate size of 0) puts everything at position 0.
    assert_eq!(ring_position(b"alpha", RingSize::new(1)), RingPosition::new(0));
    assert_eq!(ring_position(b"alpha", RingSize::new(0)), RingPosition::new(0));
}

#[test]
fn members_are_sorted_by_position_then_address() {
    let ring = HashRing::from_members(
        Address::from("A"),
        RingSize::new(100),
        vec![member("Z", 5), member("B", 50), member("A", 50), member("M", 20)],
    );
    assert_eq!(addresses(ring.members()), vec!["Z", "M", "A", "B"]);
}

#[test]
fn locate_picks_first_member_at_or_after_key_position() {
    let ring = three_member_ring();

    let replicas = ring.locate_position(RingPosition::new(50));
    assert_eq!(addresses(replicas.members()), vec!["C", "A", "B"]);
    assert_eq!(replicas.coordinator().unwrap().address(), &Address::from("C"));

    // Exactly on a member's position.
    let replicas = ring.locate_position(RingPosition::new(40));
    assert_eq!(addresses(replicas.members()), vec!["B", "C", "A"]);

    let replicas = ring.locate_position(RingPosition::new(11));
    assert_eq!(addresses(replicas.members()), vec!["B", "C", "A"]);
}

#[test]
fn locate_wraps_around_to_first_member() {
    let ring = three_member_ring();

    // Past the last member.
    let replicas = ring.locate_position(RingPosition::new(71));
    assert_eq!(addresses(replicas.members()), vec!["A", "B", "C"]);

    // At or before the first member.
    for position in [0, 5, 10] {
        let replicas = ring.locate_position(RingPosition::new(position));
        assert_eq!(addresses(replicas.members()), vec!["A", "B", "C"]);
    }
}

#[test]
fn replica_set_rotates_past_end_of_ring() {
    let ring = HashRing::from_members(
        Address::from("A"),
        RingSize::new(100),
        vec![member("A", 10), member("B", 40), member("C", 70), member("D", 90)],
    );

    let replicas = ring.locate_position(RingPosition::new(80));
    assert_eq!(replicas.len(), REPLICATION_FACTOR);
    assert_eq!(addresses(replicas.members()), vec!["D", "A", "B"]);

    assert_eq!(replicas.role_of(&Address::from("D")), Some(ReplicaRole::Primary));
    assert_eq!(replicas.role_of(&Address::from("A")), Some(ReplicaRole::Secondary));
    assert_eq!(replicas.role_of(&Address::from("B")), Some(ReplicaRole::Tertiary));
    assert_eq!(replicas.role_of(&Address::from("C")), None);
    assert!(!replicas.contains(&Address::from("C")));
}

#[test]
fn locate_is_empty_below_replication_factor() {
    let ring = HashRing::from_members(
        Address::from("A"),
        RingSize::new(100),
        vec![member("A", 10), member("B", 40)],
    );
    assert!(ring.locate_position(RingPosition::new(20)).is_empty());
    assert!(ring.locate("any key").is_empty());
    assert!(ring.successors().is_empty());
    assert!(ring.predecessors().is_empty());
}

#[test]
fn locate_by_key_agrees_with_locate_by_position() {
    let ring = three_member_ring();
    for key in ["alpha", "beta", "gamma", "delta"] {
        assert_eq!(ring.locate(key), ring.locate_position(ring.key_position(key)));
    }
}

#[test]
fn successors_and_predecessors_of_local_node() {
    let ring = HashRing::from_members(
        Address::from("B"),
        RingSize::new(100),
        vec![member("A", 10), member("B", 40), member("C", 70), member("D", 90)],
    );
    assert_eq!(ring.my_index(), Some(1));
    assert_eq!(addresses(&ring.successors()), vec!["C", "D"]);
    assert_eq!(addresses(&ring.predecessors()), vec!["A", "D"]);
}

#[test]
fn refresh_includes_local_node_and_detects_changes() {
    let mut ring = HashRing::new(Address::from("node-0"), RingSize::default());
    assert!(ring.is_empty());

    // The first refresh places the local node, even if the live list leaves it out.
    assert_eq!(ring.refresh(Vec::<Address>::new()), RingChange::Changed);
    assert_eq!(ring.len(), 1);
    assert_eq!(ring.my_index(), Some(0));

    let live: Vec<Address> = ["node-0", "node-1", "node-2"].into_iter().map(Address::from).collect();
    assert!(ring.refresh(live.clone()).is_changed());
    assert_eq!(ring.len(), 3);

    // Same members in another order, with a duplicate.
    let mut shuffled = live.clone();
    shuffled.reverse();
    shuffled.push(Address::from("node-1"));
    assert_eq!(ring.refresh(shuffled), RingChange::Unchanged);
    assert_eq!(ring.len(), 3);

    // A member leaves.
    assert!(ring.refresh(live[..2].to_vec()).is_changed());
    assert_eq!(ring.len(), 2);

    for pair in ring.members().windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn random_rings_always_yield_three_consecutive_members() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let size = rng.gen_range(3, 12);
        let members: Vec<Member> = (0..size)
            .map(|index| member(&format!("node-{}", index), rng.gen_range(0, 512)))
            .collect();
        let ring = HashRing::from_members(Address::from("node-0"), RingSize::default(), members);
        let position = RingPosition::new(rng.gen_range(0, 512));

        let replicas = ring.locate_position(position);
        assert_eq!(replicas.len(), REPLICATION_FACTOR);

        // The coordinator is the first member at or after the position, wrapping to the first member.
        let coordinator = ring
            .members()
            .iter()
            .position(|member| member.position() >= position)
            .unwrap_or(0);
        for (offset, replica) in replicas.members().iter().enumerate() {
            assert_eq!(replica, &ring.members()[(coordinator + offset) % ring.len()]);
        }
    }
}

#[test]
fn coordinator_is_stable_under_rotation_of_input_order() {
    let mut members = vec![member("A", 10), member("B", 40), member("C", 70), member("D", 90)];
    let expected = HashRing::from_members(Address::from("A"), RingSize::new(100), members.clone())
        .locate_position(RingPosition::new(55));

    for _ in 0..members.len() {
        members.rotate_left(1);
        let ring = HashRing::from_members(Address::from("A"), RingSize::new(100), members.clone());
        assert_eq!(ring.locate_position(RingPosition::new(55)), expected);
    }
    assert_eq!(addresses(expected.members()), vec!["C", "D", "A"]);
}
