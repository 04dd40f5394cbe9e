//! End-to-end call scenarios, driven only through `IsupEngine`'s public
//! surface (no access to `CallTable`/`IsupCall` internals beyond what a
//! host application would see).

use isup::{Cause, CircuitGroupSupervisionInd, IsupEvent, NumberParam};
use ss7_core::{Cic, PointCode, SwitchType};

#[test]
fn itu_iam_round_trip_with_calling_party() {
    let mut caller = isup::IsupEngine::new(SwitchType::Itu);
    caller.init_call(PointCode(2), Cic(1));
    caller.set_called(PointCode(2), Cic(1), NumberParam::new(3, "12345")).unwrap();
    caller.set_calling(PointCode(2), Cic(1), NumberParam::new(0, "7654321")).unwrap();
    let wire = caller.iam(PointCode(2), Cic(1)).unwrap();

    let mut callee = isup::IsupEngine::new(SwitchType::Itu);
    let event = callee.receive(PointCode(9), &wire).unwrap();
    match event {
        IsupEvent::Iam { cic, opc, called, calling } => {
            assert_eq!(cic, Cic(1));
            assert_eq!(opc, PointCode(9));
            assert_eq!(called.digits, "12345#");
            assert_eq!(calling.unwrap().digits, "7654321");
        }
        other => panic!("expected Iam, got {other:?}"),
    }
}

#[test]
fn reset_sequence_round_trips_range_and_status() {
    let mut requester = isup::IsupEngine::new(SwitchType::Itu);
    let grs_wire = requester.grs(Cic(1), 1, 24).unwrap();

    let mut responder = isup::IsupEngine::new(SwitchType::Itu);
    let grs_event = responder.receive(PointCode(2), &grs_wire).unwrap();
    let IsupEvent::Grs { startcic, endcic, .. } = grs_event else {
        panic!("expected Grs event");
    };
    assert_eq!((startcic, endcic), (1, 24));

    let status = vec![0u8; ((endcic - startcic + 1) as usize).div_ceil(4)];
    let gra_wire = responder.gra(Cic(1), 1, 24, status.clone()).unwrap();

    let gra_event = requester.receive(PointCode(3), &gra_wire).unwrap();
    match gra_event {
        IsupEvent::Gra { startcic, endcic, .. } => {
            assert_eq!((startcic, endcic), (1, 24));
        }
        other => panic!("expected Gra, got {other:?}"),
    }
}

#[test]
fn circuit_group_blocking_transient_is_freed_by_its_ack() {
    let mut node = isup::IsupEngine::new(SwitchType::Itu);
    let cgb_wire = {
        let mut peer = isup::IsupEngine::new(SwitchType::Itu);
        peer.cgb(Cic(40), 40, 43, CircuitGroupSupervisionInd { supervision_type: 0 }).unwrap()
    };
    node.receive(PointCode(1), &cgb_wire).unwrap();
    assert_eq!(node.calls().transient_count(), 1);

    let cgba_wire = {
        let mut peer = isup::IsupEngine::new(SwitchType::Itu);
        peer.cgba(Cic(40), 40, 43, CircuitGroupSupervisionInd { supervision_type: 0 }).unwrap()
    };
    node.receive(PointCode(1), &cgba_wire).unwrap();
    assert_eq!(node.calls().transient_count(), 0);
}

#[test]
fn ansi_iam_uses_three_fixed_and_two_variable_parameters() {
    let mut engine = isup::IsupEngine::new(SwitchType::Ansi);
    engine.init_call(PointCode(2), Cic(7));
    engine.set_called(PointCode(2), Cic(7), NumberParam::new(3, "911")).unwrap();
    engine.set_user_service_info(PointCode(2), Cic(7), vec![0x02, 0x00, 0x00]).unwrap();
    let wire = engine.iam(PointCode(2), Cic(7)).unwrap();

    let parsed = isup::codec::parse_message(SwitchType::Ansi, &wire).unwrap();
    assert_eq!(parsed.fixed.len(), 3);
    assert_eq!(parsed.variable.len(), 2);
}

#[test]
fn circuit_group_blocking_round_trips_supervision_kind() {
    let mut a = isup::IsupEngine::new(SwitchType::Itu);
    let wire = a.cgb(Cic(40), 40, 43, CircuitGroupSupervisionInd { supervision_type: 0 }).unwrap();

    let mut b = isup::IsupEngine::new(SwitchType::Itu);
    let event = b.receive(PointCode(1), &wire).unwrap();
    match event {
        IsupEvent::Cgb { supervision, startcic, endcic, .. } => {
            assert_eq!(supervision.supervision_type, 0);
            assert_eq!((startcic, endcic), (40, 43));
        }
        other => panic!("expected Cgb, got {other:?}"),
    }
}

#[test]
fn rel_carries_cause_and_rlc_frees_the_call() {
    let mut a = isup::IsupEngine::new(SwitchType::Itu);
    a.init_call(PointCode(2), Cic(7));
    a.set_called(PointCode(2), Cic(7), NumberParam::new(3, "555")).unwrap();

    let mut b = isup::IsupEngine::new(SwitchType::Itu);
    let iam_wire = a.iam(PointCode(2), Cic(7)).unwrap();
    b.receive(PointCode(1), &iam_wire).unwrap();
    assert!(b.calls().contains(PointCode(1), Cic(7)));

    let rel_wire = b.rel(PointCode(1), Cic(7), Cause::new(0x1, 16)).unwrap();
    let rel_event = a.receive(PointCode(2), &rel_wire).unwrap();
    match rel_event {
        IsupEvent::Rel { cause, .. } => assert_eq!(cause.value, 16),
        other => panic!("expected Rel, got {other:?}"),
    }

    let rlc_wire = a.rlc(PointCode(2), Cic(7)).unwrap();
    assert!(!a.calls().contains(PointCode(2), Cic(7)));
    let rlc_event = b.receive(PointCode(1), &rlc_wire).unwrap();
    assert!(matches!(rlc_event, IsupEvent::Rlc { .. }));
    assert!(!b.calls().contains(PointCode(1), Cic(7)));
}
