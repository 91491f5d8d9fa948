use netbw::netbw_tc::DryRun;
use netbw::{Bandwidth, Rate, Shaper};
use pnet::util::MacAddr;

use crate::helpers::init_tracing;

#[test]
fn plug_update_unplug() {
    init_tracing();

    let shaper = Shaper::default();
    let network = Bandwidth::new().with_inbound(Rate::new().with_average(10_000));
    let iface = Bandwidth::new().with_inbound(Rate::new().with_average(1000).with_floor(2000));
    let mac = MacAddr::new(0x52, 0x54, 0x00, 0x11, 0x22, 0x33);

    let mut commands = shaper.generate("virbr0", Some(&network), true).unwrap();
    commands.extend(shaper.plug("virbr0", &network, mac, &iface, 3).unwrap());
    commands.extend(shaper.update_rate("virbr0", 2, &network, 8000).unwrap());
    commands.extend(shaper.unplug("virbr0", 3).unwrap());
    commands.extend(shaper.update_rate("virbr0", 2, &network, 10_000).unwrap());

    let mut dry_run = DryRun::default();
    shaper.apply(&mut dry_run, &commands).unwrap();

    let lines: Vec<_> = dry_run.buffer().lines().collect();
    assert_eq!(
        lines[2..],
        [
            "/sbin/tc qdisc add dev virbr0 root handle 1: htb default 2",
            "/sbin/tc class add dev virbr0 parent 1: classid 1:1 htb rate 10000kbps ceil 10000kbps",
            "/sbin/tc class add dev virbr0 parent 1:1 classid 1:2 htb rate 10000kbps ceil 10000kbps",
            "/sbin/tc qdisc add dev virbr0 parent 1:2 handle 2: sfq perturb 10",
            "/sbin/tc filter add dev virbr0 parent 1:0 protocol ip handle 1 fw flowid 1",
            "/sbin/tc class add dev virbr0 parent 1:1 classid 1:3 htb rate 2000kbps ceil 10000kbps",
            "/sbin/tc qdisc add dev virbr0 parent 1:3 handle 3: sfq perturb 10",
            "/sbin/tc filter add dev virbr0 parent 1:0 protocol all prio 3 u32 \
             match u16 0x0800 0xffff at -2 match u32 0x00112233 0xffffffff at -12 \
             match u16 0x5254 0xffff at -14 flowid 1:3",
            "/sbin/tc class change dev virbr0 classid 1:2 htb rate 8000kbps ceil 10000kbps",
            "/sbin/tc qdisc del dev virbr0 parent 1:3 handle 3:",
            "/sbin/tc filter del dev virbr0 prio 3",
            "/sbin/tc class del dev virbr0 classid 1:3",
            "/sbin/tc class change dev virbr0 classid 1:2 htb rate 10000kbps ceil 10000kbps",
        ]
    );
}
