use netbw::netbw_tc::runner::{Error as ExecError, Output, Result as ExecResult};
use netbw::netbw_tc::{DryRun, Executor, TcCommand};
use netbw::{parse, Bandwidth, Error, Rate, Shaper};

use crate::helpers::init_tracing;

const ETH0: &str = "/sbin/tc qdisc del dev eth0 root
/sbin/tc qdisc del dev eth0 ingress
/sbin/tc qdisc add dev eth0 root handle 1: htb default 1
/sbin/tc class add dev eth0 parent 1: classid 1:1 htb rate 1kbps ceil 2kbps burst 4kb
/sbin/tc qdisc add dev eth0 parent 1:1 handle 2: sfq perturb 10
/sbin/tc filter add dev eth0 parent 1:0 protocol ip handle 1 fw flowid 1
/sbin/tc qdisc add dev eth0 ingress
/sbin/tc filter add dev eth0 parent ffff: protocol ip u32 match ip src 0.0.0.0/0 police rate 5kbps burst 7kb mtu 64kb drop flowid :1
";

fn eth0_bandwidth() -> Bandwidth {
    Bandwidth::new()
        .with_inbound(Rate::new().with_average(1).with_peak(2).with_floor(3).with_burst(4))
        .with_outbound(Rate::new().with_average(5).with_peak(6).with_burst(7))
}

#[test]
fn set_dry_run() {
    init_tracing();

    let mut dry_run = DryRun::default();
    Shaper::default().set(&mut dry_run, "eth0", Some(&eth0_bandwidth()), false).unwrap();

    assert_eq!(dry_run.buffer(), ETH0);
}

#[test]
fn set_from_parsed_document() {
    init_tracing();

    let bandwidth = parse(
        "<bandwidth>
           <inbound average='1' peak='2' floor='3' burst='4'/>
           <outbound average='5' peak='6' burst='7'/>
         </bandwidth>",
    )
    .unwrap();

    let mut dry_run = DryRun::default();
    Shaper::default().set(&mut dry_run, "eth0", Some(&bandwidth), false).unwrap();

    assert_eq!(dry_run.buffer(), ETH0);
}

#[test]
fn set_with_custom_program() {
    let mut dry_run = DryRun::new("tc");
    Shaper::default().set(&mut dry_run, "eth0", None, false).unwrap();

    assert_eq!(dry_run.buffer(), "tc qdisc del dev eth0 root\ntc qdisc del dev eth0 ingress\n");
}

#[test]
fn unset_dry_run() {
    let mut dry_run = DryRun::default();
    Shaper::default().unset(&mut dry_run, "vnet3").unwrap();

    assert_eq!(
        dry_run.buffer(),
        "/sbin/tc qdisc del dev vnet3 root\n/sbin/tc qdisc del dev vnet3 ingress\n"
    );
}

#[test]
fn set_rejects_bad_device_before_running() {
    let mut dry_run = DryRun::default();
    let err = Shaper::default().set(&mut dry_run, "eth 0", Some(&eth0_bandwidth()), false);

    assert!(matches!(err, Err(Error::InvalidArgument(_))));
    assert!(dry_run.commands().is_empty());
}

/// Fails every command that isn't a deletion.
#[derive(Default)]
struct RejectAdds {
    executed: Vec<TcCommand>,
}

impl Executor for RejectAdds {
    fn execute(&mut self, command: &TcCommand) -> ExecResult<Output> {
        self.executed.push(command.clone());
        if command.is_delete() {
            Ok(Output::default())
        } else {
            Err(ExecError::Empty)
        }
    }
}

#[test]
fn set_stops_at_first_failed_add() {
    init_tracing();

    let mut executor = RejectAdds::default();
    let err = Shaper::default().set(&mut executor, "eth0", Some(&eth0_bandwidth()), false);

    assert!(matches!(err, Err(Error::Execution(_))));
    assert_eq!(executor.executed.len(), 3);
}

#[test]
fn generate_is_deterministic() {
    let mut rng = rand::thread_rng();

    for _ in 0..100 {
        let bandwidth = crate::helpers::random_option(&mut rng);
        let hierarchical = rand::random();

        let a = netbw::generate("vnet0", bandwidth.as_ref(), hierarchical).unwrap();
        let b = netbw::generate("vnet0", bandwidth.as_ref(), hierarchical).unwrap();

        assert_eq!(a, b);
        assert!(a.len() >= 2);
        assert!(a[..2].iter().all(TcCommand::is_delete));
        assert!(a[2..].iter().all(|c| !c.is_delete()));
    }
}
