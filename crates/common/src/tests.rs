use super::*;

#[test]
fn pid_factory_is_strictly_increasing() {
    let mut factory = PidFactory::new();
    let a = factory.next_pid();
    let b = factory.next_pid();
    let c = factory.next_pid();

    assert!(a < b && b < c);
    assert_eq!(factory.issued(), 3);
}

#[test]
fn independent_factories_do_not_interfere() {
    let mut one = PidFactory::new();
    let mut two = PidFactory::new();

    assert_eq!(one.next_pid(), Pid(0));
    assert_eq!(two.next_pid(), Pid(0));
    assert_eq!(one.next_pid(), Pid(1));
}

#[test]
fn errors_carry_their_kind_in_display() {
    let err = PlanError::Invariant("deleteNode target is not unary".into());
    assert!(format!("{err}").starts_with("invariant violation"));

    let err = PlanError::MalformedJoinPredicate("a.x belongs to neither side".into());
    assert!(format!("{err}").contains("join predicate"));
}
