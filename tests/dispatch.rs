use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use corelog::{hooks, Config, LogError, Logger, MutexHooks, Severity, SinkKind};
use parking_lot::Mutex;

type Buffer = Arc<Mutex<Vec<u8>>>;

fn buffer() -> Buffer {
    Arc::new(Mutex::new(Vec::new()))
}

fn lines(buffer: &Buffer) -> Vec<String> {
    String::from_utf8(buffer.lock().clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn capped(max_sinks: usize) -> Logger {
    Logger::with_config(
        Severity::Trace,
        Config {
            max_sinks,
            ..Config::new()
        },
    )
}

#[test]
fn sixth_console_sink_is_rejected_and_first_five_stay_in_order() {
    let mut logger = capped(5);
    let outputs: Vec<Buffer> = (0..6).map(|_| buffer()).collect();

    for out in &outputs[..5] {
        logger.add_console_sink(Some(out.clone()), Severity::Trace).unwrap();
    }
    assert_eq!(
        logger.add_console_sink(Some(outputs[5].clone()), Severity::Trace),
        Err(LogError::TooManySinks {
            kind: SinkKind::Console,
            capacity: 5
        })
    );
    assert_eq!(logger.sink_count(SinkKind::Console), 5);

    corelog::info!(logger, "first");
    corelog::info!(logger, "second");

    for out in &outputs[..5] {
        let got = lines(out);
        assert_eq!(got.len(), 2);
        assert!(got[0].ends_with(": first"));
        assert!(got[1].ends_with(": second"));
    }
    assert!(outputs[5].lock().is_empty());
}

#[test]
fn failed_registration_is_repeatable() {
    let mut logger = capped(1);
    logger.add_file_sink(Some(buffer()), Severity::Info).unwrap();

    for _ in 0..3 {
        assert!(matches!(
            logger.add_file_sink(Some(buffer()), Severity::Info),
            Err(LogError::TooManySinks { .. })
        ));
        assert_eq!(logger.sink_count(SinkKind::File), 1);
    }
}

#[test]
fn null_handle_does_not_count() {
    let mut logger = Logger::init(Severity::Trace);

    assert_eq!(
        logger.add_console_sink(None, Severity::Trace),
        Err(LogError::NullTarget(SinkKind::Console))
    );
    assert_eq!(logger.sink_count(SinkKind::Console), 0);
}

#[test]
fn warn_reaches_info_sink_only_and_error_reaches_both() {
    let (info, error) = (buffer(), buffer());
    let mut logger = Logger::init(Severity::Trace);
    logger.add_console_sink(Some(info.clone()), Severity::Info).unwrap();
    logger.add_console_sink(Some(error.clone()), Severity::Error).unwrap();

    corelog::warn!(logger, "low memory");
    assert_eq!(lines(&info).len(), 1);
    assert!(error.lock().is_empty());

    corelog::error!(logger, "out of memory");
    assert_eq!(lines(&info).len(), 2);
    assert_eq!(lines(&error).len(), 1);
}

#[test]
fn global_threshold_short_circuits_permissive_sink() {
    let file = buffer();
    let mut logger = Logger::init(Severity::Info);
    logger.add_file_sink(Some(file.clone()), Severity::Trace).unwrap();

    corelog::debug!(logger, "noise {}", 1);
    assert!(file.lock().is_empty());
}

#[test]
fn every_call_locks_then_unlocks_once() {
    let locks = Arc::new(AtomicUsize::new(0));
    let unlocks = Arc::new(AtomicUsize::new(0));
    let order_ok = Arc::new(AtomicUsize::new(1));

    let (l, u, ok) = (locks.clone(), unlocks.clone(), order_ok.clone());
    let lock_counter = locks.clone();
    let mut logger = Logger::init_threaded(
        Severity::Warn,
        hooks(
            move || {
                l.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                // unlock must always follow its own lock
                if u.fetch_add(1, Ordering::SeqCst) + 1 != lock_counter.load(Ordering::SeqCst) {
                    ok.store(0, Ordering::SeqCst);
                }
            },
        ),
    );
    logger.add_callback_sink(|_, _: &()| {}, Some(Arc::new(())), Severity::Fatal).unwrap();

    corelog::trace!(logger, "dropped by global");
    corelog::error!(logger, "dropped by sink");
    corelog::fatal!(logger, "delivered");

    assert_eq!(locks.load(Ordering::SeqCst), 3);
    assert_eq!(unlocks.load(Ordering::SeqCst), 3);
    assert_eq!(order_ok.load(Ordering::SeqCst), 1);
}

#[test]
fn macros_record_call_site() {
    let out = buffer();
    let mut logger = Logger::init(Severity::Trace);
    logger.add_console_sink(Some(out.clone()), Severity::Trace).unwrap();

    let line = line!() + 1;
    corelog::trace!(logger, "at {}", "call site");

    let got = &lines(&out)[0];
    assert!(got.ends_with(&format!(" TRACE {}:{}: at call site", file!(), line)));
}

#[test]
fn threaded_logger_keeps_lines_whole() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 250;

    let out = buffer();
    let mut logger = Logger::init_threaded(Severity::Trace, MutexHooks::new());
    logger.add_console_sink(Some(out.clone()), Severity::Trace).unwrap();
    logger.add_file_sink(Some(buffer()), Severity::Trace).unwrap();
    let logger = Arc::new(logger);

    let workers: Vec<_> = (0..THREADS)
        .map(|id| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for n in 0..PER_THREAD {
                    corelog::info!(logger, "worker {} message {}", id, n);
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    let got = lines(&out);
    assert_eq!(got.len(), THREADS * PER_THREAD);

    for id in 0..THREADS {
        let own: Vec<_> = got
            .iter()
            .filter(|l| l.contains(&format!(": worker {} message ", id)))
            .collect();
        assert_eq!(own.len(), PER_THREAD);
        // per-thread call order survives
        for (n, line) in own.iter().enumerate() {
            assert!(line.ends_with(&format!("worker {} message {}", id, n)));
        }
    }
}

struct FlushCounter {
    flushes: Arc<AtomicUsize>,
}

impl std::io::Write for FlushCounter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn each_delivered_line_is_flushed() {
    let flushes = Arc::new(AtomicUsize::new(0));
    let mut logger = Logger::init(Severity::Trace);
    logger
        .add_file_sink(
            Some(corelog::sinks::shared(FlushCounter {
                flushes: flushes.clone(),
            })),
            Severity::Info,
        )
        .unwrap();

    corelog::debug!(logger, "below the sink threshold");
    assert_eq!(flushes.load(Ordering::SeqCst), 0);

    for n in 0..3 {
        corelog::info!(logger, "save slot {}", n);
    }
    assert_eq!(flushes.load(Ordering::SeqCst), 3);
}
