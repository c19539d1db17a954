use crate::PortAllocator;
use crate::tests::free_port;

use cs_core::{CoreError, Edition};

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, TcpListener, UdpSocket};
use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_no_request_when_allocate_then_edition_default_is_tried_first() {
    // Given
    let bedrock = free_port();
    let java = free_port();
    let allocator = PortAllocator::new(bedrock, java);

    // When
    let bedrock_reservation = allocator.allocate(None, Edition::Bedrock).unwrap();
    let java_reservation = allocator.allocate(None, Edition::Java).unwrap();

    // Then
    assert_that!(bedrock_reservation.port(), eq(bedrock));
    assert_that!(java_reservation.port(), eq(java));
}

#[test]
fn given_committed_port_when_allocate_same_port_then_next_port_is_returned() {
    // Given
    let start = free_port();
    let allocator = PortAllocator::new(start, start);
    let first = allocator.allocate(Some(start), Edition::Bedrock).unwrap().commit();

    // When
    let second = allocator.allocate(Some(start), Edition::Bedrock).unwrap();

    // Then
    assert_that!(first, eq(start));
    assert!(second.port() > start);
}

#[test]
fn given_dropped_reservation_when_allocate_again_then_port_is_reused() {
    // Given
    let start = free_port();
    let allocator = PortAllocator::new(start, start);
    let reservation = allocator.allocate(Some(start), Edition::Bedrock).unwrap();
    assert!(allocator.is_reserved(start));

    // When
    drop(reservation);

    // Then
    assert!(!allocator.is_reserved(start));
    let again = allocator.allocate(Some(start), Edition::Bedrock).unwrap();
    assert_that!(again.port(), eq(start));
}

#[test]
fn given_commit_when_inspected_then_port_moves_from_reserved_to_assigned() {
    let start = free_port();
    let allocator = PortAllocator::new(start, start);

    let port = allocator.allocate(Some(start), Edition::Java).unwrap().commit();

    assert!(allocator.is_assigned(port));
    assert!(!allocator.is_reserved(port));
}

#[test]
fn given_released_port_when_allocate_then_port_is_available_again() {
    let start = free_port();
    let allocator = PortAllocator::new(start, start);
    let port = allocator.allocate(Some(start), Edition::Bedrock).unwrap().commit();

    allocator.release(port);

    assert!(!allocator.is_assigned(port));
    assert_that!(
        allocator.allocate(Some(start), Edition::Bedrock).unwrap().port(),
        eq(start)
    );
}

#[test]
fn given_port_bound_by_foreign_process_when_allocate_then_it_is_skipped() {
    // Given
    let start = free_port();
    let _udp = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, start)).unwrap();
    let allocator = PortAllocator::new(start, start);

    // When
    let reservation = allocator.allocate(Some(start), Edition::Bedrock).unwrap();

    // Then
    assert!(reservation.port() > start);
    assert!(!PortAllocator::is_bindable(start));
}

#[test]
fn given_skipped_foreign_port_when_allocate_then_it_is_not_left_reserved() {
    // Given
    let start = free_port();
    let _udp = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, start)).unwrap();
    let allocator = PortAllocator::new(start, start);

    // When
    let reservation = allocator.allocate(Some(start), Edition::Bedrock).unwrap();

    // Then
    assert!(!allocator.is_reserved(start));
    assert!(allocator.is_reserved(reservation.port()));
}

#[test]
fn given_tcp_listener_on_port_when_is_bindable_then_false() {
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).unwrap();
    let port = listener.local_addr().unwrap().port();

    assert!(!PortAllocator::is_bindable(port));
}

#[test]
fn given_last_port_taken_when_allocate_then_ports_exhausted() {
    // Given
    let allocator = PortAllocator::new(u16::MAX, u16::MAX);
    let held = allocator.allocate(Some(u16::MAX), Edition::Bedrock);

    // When
    let result = allocator.allocate(Some(u16::MAX), Edition::Bedrock);

    // Then
    match held {
        Ok(_reservation) => {
            assert!(matches!(result, Err(CoreError::PortsExhausted { start: u16::MAX, .. })));
        }
        // Port 65535 is in use on this host; exhaustion is immediate
        Err(e) => assert!(matches!(e, CoreError::PortsExhausted { .. })),
    }
}

#[test]
fn given_concurrent_allocations_when_all_hold_reservations_then_ports_are_distinct() {
    // Given
    let start = free_port();
    let allocator = Arc::new(PortAllocator::new(start, start));

    // When
    let reservations = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                scope.spawn(move || allocator.allocate(Some(start), Edition::Bedrock).unwrap())
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    // Then
    let ports: BTreeSet<u16> = reservations.iter().map(|r| r.port()).collect();
    assert_that!(ports.len(), eq(reservations.len()));
}
