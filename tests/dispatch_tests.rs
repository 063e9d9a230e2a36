use pathfan::{
    Error, Executor, Job, Runner, RunnerOpts, rayon_factory, run, run_iter, thread_factory,
    walk_and_run,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

fn name_len(path: &Path) -> anyhow::Result<usize> {
    Ok(path.as_os_str().len())
}

fn thread_runner(concurrency: usize) -> Runner {
    Runner::new(&RunnerOpts::default())
        .unwrap()
        .with_executor_factory(move || thread_factory(concurrency)())
}

#[test]
fn test_run_maps_every_path() {
    let input = paths(&["a", "bb", "ccc", "dddd"]);
    let result = run(input.clone(), name_len).unwrap();
    let expected: HashMap<PathBuf, usize> = input
        .into_iter()
        .map(|p| {
            let n = p.as_os_str().len();
            (p, n)
        })
        .collect();
    assert_eq!(result, expected);
}

#[test]
fn test_run_empty_input() {
    let result = run(Vec::<PathBuf>::new(), name_len).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_run_collapses_duplicates_and_calls_once_per_path() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let result = thread_runner(2)
        .run(paths(&["x", "y", "x", "x"]), move |p: &Path| {
            counter.fetch_add(1, Ordering::SeqCst);
            name_len(p)
        })
        .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_run_fails_when_one_path_fails() {
    let err = run(paths(&["good.py", "bad.py"]), |p: &Path| {
        if p.ends_with("bad.py") {
            anyhow::bail!("cannot handle {}", p.display());
        }
        Ok(1)
    })
    .unwrap_err();
    match err {
        Error::Work { path, error } => {
            assert_eq!(path, PathBuf::from("bad.py"));
            assert!(error.to_string().contains("cannot handle bad.py"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_run_reports_panics_as_errors() {
    let err = thread_runner(2)
        .run(paths(&["ok", "boom"]), |p: &Path| -> anyhow::Result<u8> {
            if p == Path::new("boom") {
                panic!("exploded on {}", p.display());
            }
            Ok(0)
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::WorkPanicked { ref path, ref message }
            if path == Path::new("boom") && message == "exploded on boom"
    ));
}

#[test]
fn test_run_waits_for_running_jobs_on_failure() {
    let finished = Arc::new(AtomicUsize::new(0));
    let done = Arc::clone(&finished);
    let result = thread_runner(2).run(paths(&["fail", "slow"]), move |p: &Path| {
        if p == Path::new("fail") {
            anyhow::bail!("fail");
        }
        thread::sleep(Duration::from_millis(100));
        done.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    assert!(result.is_err());
    // The pool was released before `run` returned, so the slow job had finished.
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_work_runs_off_the_caller_thread() {
    let caller = thread::current().id();
    for runner in [thread_runner(2), Runner::new(&RunnerOpts::default()).unwrap()] {
        let result = runner
            .run(paths(&["a", "b", "c"]), move |_p: &Path| {
                Ok(thread::current().id() != caller)
            })
            .unwrap();
        assert!(result.values().all(|off_caller| *off_caller));
    }
}

#[test]
fn test_concurrency_bounds_parallelism() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (a, pk) = (Arc::clone(&active), Arc::clone(&peak));
    let runner = Runner::new(&RunnerOpts {
        concurrency: 2,
        ..Default::default()
    })
    .unwrap();
    let names: Vec<String> = (0..8).map(|i| format!("p{i}")).collect();
    let input: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
    runner
        .run(input, move |_p: &Path| {
            let now = a.fetch_add(1, Ordering::SeqCst) + 1;
            pk.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            a.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[test]
fn test_run_iter_yields_in_completion_order() {
    let input = paths(&["slow", "fast"]);
    let order: Vec<PathBuf> = thread_runner(2)
        .run_iter(input, |p: &Path| {
            if p == Path::new("slow") {
                thread::sleep(Duration::from_millis(200));
            }
            Ok(())
        })
        .unwrap()
        .map(|r| r.unwrap().0)
        .collect();
    assert_eq!(order, paths(&["fast", "slow"]));
}

#[test]
fn test_run_iter_matches_run() {
    let input = paths(&["one", "two", "three", "four", "five"]);
    let batch = run(input.clone(), name_len).unwrap();
    let streamed: HashMap<PathBuf, usize> = run_iter(input, name_len)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(batch, streamed);
}

#[test]
fn test_run_iter_continues_after_failure() {
    let mut iter = thread_runner(1)
        .run_iter(paths(&["a", "bad", "c"]), |p: &Path| {
            if p == Path::new("bad") {
                anyhow::bail!("nope");
            }
            Ok(p.to_path_buf())
        })
        .unwrap();
    assert_eq!(iter.remaining(), 3);
    let outcomes: Vec<_> = iter.by_ref().collect();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes.iter().filter(|r| r.is_err()).count(), 1);
    assert!(matches!(
        outcomes.iter().find(|r| r.is_err()),
        Some(Err(Error::Work { path, .. })) if path == Path::new("bad")
    ));
    assert_eq!(iter.remaining(), 0);
    assert!(iter.next().is_none());
}

#[test]
fn test_run_iter_drop_early_releases_pool() {
    let finished = Arc::new(AtomicUsize::new(0));
    let done = Arc::clone(&finished);
    let runner = Runner::new(&RunnerOpts::default())
        .unwrap()
        .with_executor_factory(|| rayon_factory(2)());
    let mut iter = runner
        .run_iter(paths(&["a", "b", "c", "d"]), move |_p: &Path| {
            thread::sleep(Duration::from_millis(30));
            done.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();
    assert!(iter.next().unwrap().is_ok());
    drop(iter);
    assert_eq!(finished.load(Ordering::SeqCst), 4);
}

#[test]
fn test_custom_executor_factory_is_called_per_dispatch() {
    let built = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&built);
    let runner = Runner::new(&RunnerOpts::default())
        .unwrap()
        .with_executor_factory(move || {
            *counter.lock().unwrap() += 1;
            thread_factory(1)()
        });
    runner.run(paths(&["a"]), name_len).unwrap();
    runner.run_iter(paths(&["b"]), name_len).unwrap().for_each(drop);
    assert_eq!(*built.lock().unwrap(), 2);
}

#[test]
fn test_failing_factory_surfaces_pool_error() {
    let runner = Runner::new(&RunnerOpts::default())
        .unwrap()
        .with_executor_factory(|| Err(Error::Pool("no workers today".to_string())));
    assert!(matches!(
        runner.run(paths(&["a"]), name_len),
        Err(Error::Pool(_))
    ));
}

/// Accepts every job and never runs it.
struct DroppingExecutor;

impl Executor for DroppingExecutor {
    fn submit(&self, job: Job) -> pathfan::Result<()> {
        drop(job);
        Ok(())
    }

    fn shutdown(&mut self) {}
}

fn dropping_runner() -> Runner {
    Runner::new(&RunnerOpts::default())
        .unwrap()
        .with_executor_factory(|| Ok(Box::new(DroppingExecutor) as Box<dyn Executor>))
}

#[test]
fn test_lost_jobs_are_reported_by_run_and_run_iter() {
    let runner = dropping_runner();
    assert!(matches!(
        runner.run(paths(&["a", "b"]), name_len),
        Err(Error::JobLost(path)) if path == Path::new("a")
    ));

    let mut iter = runner.run_iter(paths(&["a", "b"]), name_len).unwrap();
    let lost: Vec<PathBuf> = iter
        .by_ref()
        .map(|r| match r {
            Err(Error::JobLost(path)) => path,
            other => panic!("expected a lost job, got {other:?}"),
        })
        .collect();
    assert_eq!(lost, paths(&["a", "b"]));
    assert_eq!(iter.remaining(), 0);
    assert!(iter.next().is_none());
}

#[test]
fn test_walk_and_run_over_walked_files() {
    let td = TempDir::new().unwrap();
    let root = td.path().canonicalize().unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    fs::create_dir_all(root.join("pkg")).unwrap();
    fs::create_dir_all(root.join("other")).unwrap();
    fs::write(root.join("pkg/a.py"), "x = 1\n").unwrap();
    fs::write(root.join("pkg/b.py"), "y = 22\n").unwrap();
    fs::write(root.join("pkg/notes.txt"), "skip me\n").unwrap();
    fs::write(root.join("other/c.py"), "z = 333\n").unwrap();
    fs::write(root.join("other/gen.py"), "generated\n").unwrap();

    let result = walk_and_run(
        vec![root.join("pkg"), root.join("other")],
        |p: &Path| Ok(fs::read_to_string(p)?.len()),
        &["gen.py".to_string()],
    )
    .unwrap();

    let expected: HashMap<PathBuf, usize> = [
        (root.join("pkg/a.py"), 6),
        (root.join("pkg/b.py"), 7),
        (root.join("other/c.py"), 8),
    ]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
}
