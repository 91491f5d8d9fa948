mod floor;
mod merge;
mod shaper;
mod xml;

/// Random specifications, each field independently unset or small.
pub(crate) mod helpers {
    use netbw::{Bandwidth, Rate};
    use rand::Rng;

    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt::try_init();
    }

    pub fn random_rate<R: Rng>(rng: &mut R) -> Rate {
        let mut field = || if rng.gen_bool(0.3) { 0 } else { rng.gen_range(1..100_000) };

        Rate::new()
            .with_average(field())
            .with_peak(field())
            .with_floor(field())
            .with_burst(field())
    }

    pub fn random_bandwidth<R: Rng>(rng: &mut R) -> Bandwidth {
        let mut bandwidth = Bandwidth::new();
        if rng.gen_bool(0.8) {
            bandwidth = bandwidth.with_inbound(random_rate(rng));
        }
        if rng.gen_bool(0.8) {
            bandwidth = bandwidth.with_outbound(random_rate(rng));
        }
        bandwidth
    }

    pub fn random_option<R: Rng>(rng: &mut R) -> Option<Bandwidth> {
        rng.gen_bool(0.9).then(|| random_bandwidth(rng))
    }
}
