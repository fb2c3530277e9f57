//! touchmap-control-osc
//!
//! Feeds pad contact events from OSC senders (TouchOSC, tablets, sensor apps) over UDP.
//!
//! Address convention:
//! - `/pad/<pad>/start <contact> <x> <y> [pressure]`
//! - `/pad/<pad>/move  <contact> <x> <y> [pressure]`
//! - `/pad/<pad>/end   <contact>`
//!
//! Numeric arguments may be Float, Double, Int or Long. Anything else is dropped.
//!
//! rosc 0.10.x API note:
//! - `rosc::decoder::decode_udp` returns `Result<(&[u8], OscPacket), _>` (nom-style),
//!   where the first tuple element is the *unconsumed remainder* of the buffer.

use std::io;
use std::net::UdpSocket;
use std::time::Instant;

use rosc::{OscPacket, OscType};
use touchmap_core::ParameterStore;
use touchmap_pad::{ContactEvent, ContactId, PadId, PadSurface};

/// A contact event addressed to one pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadContactMessage {
    pub pad: PadId,
    pub event: ContactEvent,
    /// When the datagram carrying this message was read off the socket.
    pub received_at: Instant,
}

/// Non-blocking UDP OSC receiver that extracts contact messages.
#[derive(Debug)]
pub struct OscContactReceiver {
    sock: UdpSocket,
    buf: [u8; 2048],
}

impl OscContactReceiver {
    /// Bind to an address like "127.0.0.1:9000" and put the socket in non-blocking mode.
    pub fn bind(addr: &str) -> io::Result<Self> {
        let sock = UdpSocket::bind(addr)?;
        sock.set_nonblocking(true)?;
        Ok(Self {
            sock,
            buf: [0u8; 2048],
        })
    }

    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.sock.local_addr()
    }

    /// Poll the socket and return every contact message available right now, in arrival order.
    ///
    /// This never blocks; it drains the UDP socket until `WouldBlock`.
    pub fn poll(&mut self) -> Vec<PadContactMessage> {
        let mut out = Vec::new();

        loop {
            match self.sock.recv_from(&mut self.buf) {
                Ok((n, _from)) => match rosc::decoder::decode_udp(&self.buf[..n]) {
                    Ok((_rest, pkt)) => extract_from_packet(pkt, Instant::now(), &mut out),
                    Err(e) => tracing::warn!(error = ?e, "undecodable OSC packet"),
                },
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!(error = %e, "OSC socket error");
                    break;
                }
            }
        }

        out
    }

    /// Poll and route everything to `surface`, in arrival order. Returns the number of messages
    /// dispatched.
    pub fn pump<S>(&mut self, surface: &mut PadSurface, store: &mut S) -> usize
    where
        S: ParameterStore + ?Sized,
    {
        let messages = self.poll();
        for m in &messages {
            surface.handle(store, m.pad, m.event, m.received_at);
        }
        messages.len()
    }
}

/// Walk a packet/bundle tree and push parsed contact messages into `out`.
pub fn extract_from_packet(
    pkt: OscPacket,
    received_at: Instant,
    out: &mut Vec<PadContactMessage>,
) {
    match pkt {
        OscPacket::Message(m) => match parse_contact_message(&m.addr, &m.args, received_at) {
            Some(msg) => out.push(msg),
            None => tracing::debug!(addr = %m.addr, "ignoring OSC message"),
        },
        OscPacket::Bundle(b) => {
            for p in b.content {
                extract_from_packet(p, received_at, out);
            }
        }
    }
}

fn arg_f32(arg: &OscType) -> Option<f32> {
    match *arg {
        OscType::Float(x) => Some(x),
        OscType::Double(x) => Some(x as f32),
        OscType::Int(x) => Some(x as f32),
        OscType::Long(x) => Some(x as f32),
        _ => None,
    }
}

fn arg_u32(arg: &OscType) -> Option<u32> {
    match *arg {
        OscType::Int(x) => u32::try_from(x).ok(),
        OscType::Long(x) => u32::try_from(x).ok(),
        // Float ids are accepted when they are whole numbers.
        OscType::Float(x) if x >= 0.0 && x.fract() == 0.0 && x < 16_777_216.0 => Some(x as u32),
        OscType::Double(x) if x >= 0.0 && x.fract() == 0.0 && x <= u32::MAX as f64 => {
            Some(x as u32)
        }
        _ => None,
    }
}

/// Parse a message into a contact event if it matches the convention.
pub fn parse_contact_message(
    addr: &str,
    args: &[OscType],
    received_at: Instant,
) -> Option<PadContactMessage> {
    let rest = addr.strip_prefix("/pad/")?;
    let (pad, verb) = rest.split_once('/')?;
    let pad = PadId(pad.parse().ok()?);
    let id = ContactId(arg_u32(args.first()?)?);

    let position = || -> Option<(f32, f32, Option<f32>)> {
        let x = arg_f32(args.get(1)?)?;
        let y = arg_f32(args.get(2)?)?;
        let pressure = args.get(3).and_then(arg_f32);
        Some((x, y, pressure))
    };

    let event = match verb {
        "start" => {
            let (x, y, pressure) = position()?;
            ContactEvent::Start { id, x, y, pressure }
        }
        "move" => {
            let (x, y, pressure) = position()?;
            ContactEvent::Move { id, x, y, pressure }
        }
        "end" => ContactEvent::End { id },
        _ => return None,
    };
    Some(PadContactMessage {
        pad,
        event,
        received_at,
    })
}
