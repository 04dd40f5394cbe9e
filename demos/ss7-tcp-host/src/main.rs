//! Demo host for the `ss7` engine's TCP "external MTP2 offload" transport
//! (spec §6): two copies of this program, one per side of a plain TCP
//! connection, each standing in for a device that has already terminated
//! MTP2 itself and now only exchanges length-prefixed, state-tagged frames
//! and ISUP payloads with its peer.
//!
//! Usage:
//!     ss7-tcp-host listen <addr> <own-pc>
//!     ss7-tcp-host connect <addr> <own-pc> <peer-pc> <called-number>
//!
//! The `connect` side originates one call (an IAM to `peer-pc`) as soon as
//! both sides have exchanged their link-up frame; the `listen` side prints
//! every event it receives.

use std::net::{TcpListener, TcpStream};
use std::os::unix::io::AsRawFd;

use isup::{IsupEvent, NumberParam};
use ss7::{Ss7, Ss7Event, TransportKind};
use ss7_core::{Cic, PointCode, SwitchType};

fn usage() -> ! {
    eprintln!("usage: ss7-tcp-host listen <addr> <own-pc>");
    eprintln!("       ss7-tcp-host connect <addr> <own-pc> <peer-pc> <called-number>");
    std::process::exit(2);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("listen") => {
            let addr = args.get(2).unwrap_or_else(|| usage());
            let own_pc: u32 = args.get(3).unwrap_or_else(|| usage()).parse().expect("own-pc must be numeric");
            run_listen(addr, own_pc);
        }
        Some("connect") => {
            let addr = args.get(2).unwrap_or_else(|| usage());
            let own_pc: u32 = args.get(3).unwrap_or_else(|| usage()).parse().expect("own-pc must be numeric");
            let peer_pc: u32 = args.get(4).unwrap_or_else(|| usage()).parse().expect("peer-pc must be numeric");
            let called = args.get(5).unwrap_or_else(|| usage());
            run_connect(addr, own_pc, peer_pc, called);
        }
        _ => usage(),
    }
}

/// Wait for the fd to become readable, using a single-entry `poll(2)` —
/// the same primitive the engine's own host loop is built around (spec
/// §5's single-threaded cooperative core), just without an event library
/// behind it.
fn wait_readable(fd: i32) {
    let mut pfd = libc::pollfd { fd, events: libc::POLLIN, revents: 0 };
    loop {
        let rc = unsafe { libc::poll(&mut pfd, 1, -1) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            panic!("poll(2) failed: {err}");
        }
        if pfd.revents & libc::POLLIN != 0 {
            return;
        }
    }
}

fn drain_events(ss7: &mut Ss7) {
    while let Some(event) = ss7.check_event() {
        match event {
            Ss7Event::LinkUp(slc) => println!("link {} up", slc.0),
            Ss7Event::LinkDown(slc) => println!("link {} down", slc.0),
            Ss7Event::ProcessUp => println!("process up"),
            Ss7Event::Isup(IsupEvent::Iam { cic, opc, called, .. }) => {
                println!("IAM cic={} from opc={} called={}", cic.0, opc.0, called.digits);
            }
            Ss7Event::Isup(other) => println!("isup event: {other:?}"),
        }
    }
}

fn send_local_up(ss7: &mut Ss7, socket: &TcpStream) {
    use std::io::Write;
    let mut socket = socket.try_clone().expect("clone tcp stream");
    socket.write_all(&ss7::transport::build_up_frame()).expect("write up frame");
    let _ = ss7;
}

fn run_listen(addr: &str, own_pc: u32) {
    let listener = TcpListener::bind(addr).expect("bind");
    println!("listening on {addr}");
    let (socket, peer) = listener.accept().expect("accept");
    println!("accepted connection from {peer}");

    let mut ss7 = Ss7::new(SwitchType::Itu);
    ss7.set_pc(PointCode(own_pc));
    ss7.set_network_ind(mtp3_national());
    let fd = socket.as_raw_fd();
    ss7.add_link(TransportKind::Tcp, fd).expect("add_link");

    send_local_up(&mut ss7, &socket);

    loop {
        wait_readable(fd);
        if let Err(err) = ss7.read(fd) {
            eprintln!("read error: {err}");
            break;
        }
        drain_events(&mut ss7);
    }
}

fn run_connect(addr: &str, own_pc: u32, peer_pc: u32, called: &str) {
    let socket = TcpStream::connect(addr).expect("connect");
    println!("connected to {addr}");

    let mut ss7 = Ss7::new(SwitchType::Itu);
    ss7.set_pc(PointCode(own_pc));
    ss7.set_network_ind(mtp3_national());
    ss7.set_default_dpc(PointCode(peer_pc));
    let fd = socket.as_raw_fd();
    ss7.add_link(TransportKind::Tcp, fd).expect("add_link");

    send_local_up(&mut ss7, &socket);

    // Wait for the peer's own up frame before originating traffic.
    loop {
        wait_readable(fd);
        ss7.read(fd).expect("read");
        let mut up = false;
        while let Some(event) = ss7.check_event() {
            if matches!(event, Ss7Event::LinkUp(_)) {
                up = true;
            }
        }
        if up {
            break;
        }
    }
    println!("peer link up, originating call");

    let cic = Cic(1);
    ss7.init_call(PointCode(peer_pc), cic);
    ss7.set_called(PointCode(peer_pc), cic, NumberParam::new(3, called)).expect("set_called");
    ss7.iam(PointCode(peer_pc), cic).expect("iam");

    while ss7.pollflags(fd).expect("pollflags").write {
        ss7.write(fd).expect("write");
    }

    // Keep reading until the peer closes the connection.
    let mut probe = [0u8; 1];
    loop {
        wait_readable(fd);
        match socket.try_clone().unwrap().peek(&mut probe) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        if ss7.read(fd).is_err() {
            break;
        }
        drain_events(&mut ss7);
    }
}

fn mtp3_national() -> mtp3::NetworkIndicator {
    mtp3::NetworkIndicator::National
}
