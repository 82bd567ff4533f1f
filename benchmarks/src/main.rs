use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::{AddAssign, Div};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use vote_manager::{
    model::{candidate::Candidate, selection::Selection},
    SharedVoteManager, VacancyRule, VoteManager,
};

#[rustfmt::skip]
const CANDIDATES: &[&str] = &[
    "Alice",
    "Bob",
    "Carol",
    "Dave",
    "Eve",
    "Fred",
    "Grace",
    "Henry",
    "Irene",
    "Joe",
];

/// Ballots cast by each thread.
const ITERATIONS_PER_THREAD: usize = 10_000;

/// Candidates each ballot may choose.
const MAX_VOTES: u32 = 4;

#[derive(Parser)]
struct Args {
    /// How many threads to use. Defaults to the number of logical CPUs.
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// What kind of ballots to cast.
    #[arg(long, value_enum, default_value_t)]
    ballot_mode: BallotMode,

    /// Check the tally invariants after completion.
    #[arg(long)]
    verify: bool,
}

/// What kind of ballots to cast.
#[derive(Debug, Copy, Clone, ValueEnum)]
enum BallotMode {
    /// Only well-formed ballots.
    Valid,
    /// Only blank ballots.
    Blank,
    /// Any mixture of IDs, mostly rejected.
    Random,
    /// Attempt to model real behaviour: well-formed with 98% probability.
    Realistic,
}

impl BallotMode {
    /// Return `true` if the next ballot should be well-formed.
    fn should_be_valid(&self) -> bool {
        match self {
            Self::Valid | Self::Blank => true,
            Self::Random => false,
            Self::Realistic => rand::random::<f32>() >= 0.02,
        }
    }
}

impl Default for BallotMode {
    fn default() -> Self {
        Self::Realistic
    }
}

/// Ten primary candidates, each with a paired vacancy.
fn setup_session() -> SharedVoteManager {
    let primary = CANDIDATES
        .iter()
        .zip(1u32..)
        .map(|(name, id)| Candidate::new(id).named(*name))
        .collect::<Vec<_>>();
    let vacant = CANDIDATES
        .iter()
        .zip(1u32..)
        .map(|(name, id)| Candidate::vacant(100 + id).named(format!("{name} (vacancy)")))
        .collect::<Vec<_>>();

    VoteManager::with_rule(primary, vacant, MAX_VOTES, VacancyRule::Paired).into()
}

/// Build a ballot according to `mode`.
fn make_ballot(mode: BallotMode) -> Vec<Selection> {
    let mut rng = rand::thread_rng();
    if let BallotMode::Blank = mode {
        return Vec::new();
    }

    if mode.should_be_valid() {
        // Pick distinct primaries plus the vacancy paired with the first of them.
        let mut ids = (1..=CANDIDATES.len() as u32).collect::<Vec<_>>();
        ids.shuffle(&mut rng);
        let count = rng.gen_range(0..MAX_VOTES as usize);
        let mut ballot = ids[..count]
            .iter()
            .map(|id| Selection::from(*id))
            .collect::<Vec<_>>();
        if let Some(first) = ids[..count].first() {
            ballot.push(Selection::from(100 + first));
        }
        ballot
    } else {
        let count = rng.gen_range(0..=MAX_VOTES as usize + 1);
        (0..count)
            .map(|_| Selection::from(rng.gen_range(0..=115u32)))
            .collect()
    }
}

/// Durations and outcomes of the ballots cast by one thread.
#[derive(Debug, Default)]
struct BallotTimings {
    cast: Duration,
    accepted: u64,
    rejected: u64,
}

impl AddAssign for BallotTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.cast += rhs.cast;
        self.accepted += rhs.accepted;
        self.rejected += rhs.rejected;
    }
}

impl Div<u32> for BallotTimings {
    type Output = Self;

    fn div(self, rhs: u32) -> Self {
        Self {
            cast: self.cast / rhs,
            accepted: self.accepted,
            rejected: self.rejected,
        }
    }
}

/// Run the benchmark, returning how many ballots were accepted.
fn benchmark(
    session: &SharedVoteManager,
    num_threads: usize,
    ballot_mode: BallotMode,
) -> anyhow::Result<u64> {
    let end_val: usize = num_threads * ITERATIONS_PER_THREAD;

    let start = Instant::now();
    thread::scope(|s| {
        let mut threads = Vec::with_capacity(num_threads);

        for start in (0..end_val).step_by(ITERATIONS_PER_THREAD) {
            let t = s.spawn(move || {
                let mut timings = BallotTimings::default();

                for voter_id in start..(start + ITERATIONS_PER_THREAD) {
                    let ballot = make_ballot(ballot_mode);
                    let pre_cast = Instant::now();
                    let outcome = session.cast_vote(ballot, voter_id.to_string());
                    timings.cast += pre_cast.elapsed();
                    match outcome {
                        Ok(()) => timings.accepted += 1,
                        Err(_) => timings.rejected += 1,
                    }
                }

                timings / ITERATIONS_PER_THREAD as u32
            });
            threads.push(t);
        }

        let mut timings = BallotTimings::default();
        for t in threads {
            let thread_timings = t.join().map_err(|_| anyhow!("thread panicked"))?;
            timings += thread_timings;
        }
        let total_duration = start.elapsed();

        let avg_cast_duration = timings.cast / num_threads as u32;

        // Theoretical ballots per sec is 1/avg_duration * num_threads.
        let ballots_per_sec = num_threads as f64 / avg_cast_duration.as_secs_f64();
        // Actual ballots per sec is total_ballots / total_time.
        let actual_ballots_per_sec = end_val as f64 / total_duration.as_secs_f64();

        println!("cast: {:?} ({:.2}/s)", avg_cast_duration, ballots_per_sec);
        println!(
            "accepted: {}, rejected: {}",
            timings.accepted, timings.rejected
        );
        println!(
            "actual duration: {} ballots in {:?} ({:.2}/s)",
            end_val, total_duration, actual_ballots_per_sec
        );

        Ok(timings.accepted)
    })
}

/// Return `Ok(())` if the tallies are consistent with the accepted ballots.
fn verify(session: &SharedVoteManager, accepted: u64) -> anyhow::Result<()> {
    session.close_voting_session();
    let results = session.results();

    if results.ballots_accepted != accepted {
        return Err(anyhow!(
            "session accepted {} ballots but threads saw {}",
            results.ballots_accepted,
            accepted
        ));
    }
    if results.voters as u64 != accepted {
        return Err(anyhow!(
            "{} voters registered for {} ballots",
            results.voters,
            accepted
        ));
    }

    let total = session.vote_count().total();
    if total > accepted * u64::from(MAX_VOTES) {
        return Err(anyhow!(
            "{} votes tallied from {} ballots of at most {}",
            total,
            accepted,
            MAX_VOTES
        ));
    }

    println!("\nverification succeeded: {} votes tallied", total);
    for candidate in results.candidates.iter().take(5) {
        println!("{}", candidate);
    }

    Ok(())
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.threads == 0 {
        return Err(anyhow!("need at least one thread"));
    }

    let session = setup_session();
    let accepted = benchmark(&session, args.threads, args.ballot_mode)?;

    // Verify if requested.
    if args.verify {
        verify(&session, accepted)?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("FATAL: {}", e);
        process::exit(1);
    }
}
