//! Background move selection.
//!
//! The controller owns a `SearchDriver` and lends it to a worker thread for
//! each search. The worker gets a clone of the live board, so the caller
//! keeps using its own board while the robot thinks:
//!
//! ```text
//! start(&board) ──clone──▶ worker: driver.search(clone)
//!      │                          │
//!  poll() / wait()  ◀──channel── (driver, result)
//!      │
//!  stop() ──StopFlag──▶ worker returns its best move so far
//! ```

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use tracing::info;

use super::RobotLevel;
use crate::board::Board;
use crate::moves::MoveRecord;
use crate::rules::GameRules;
use crate::search::{Evaluator, SearchConfig, SearchDriver, SearchResult, StopFlag};

type Finished<G> = (SearchDriver<G>, SearchResult);

struct Worker<G: GameRules> {
    receiver: Receiver<Finished<G>>,
    handle: JoinHandle<()>,
}

/// Computer player: one move per invocation.
pub struct RobotController<G: GameRules> {
    /// `None` while lent to a worker.
    driver: Option<SearchDriver<G>>,
    stop: StopFlag,
    worker: Option<Worker<G>>,
}

impl<G: GameRules> RobotController<G> {
    pub fn new(config: SearchConfig) -> Self {
        let stop = StopFlag::new();
        Self {
            driver: Some(SearchDriver::new(config).with_stop_flag(stop.clone())),
            stop,
            worker: None,
        }
    }

    pub fn from_level(level: RobotLevel, seed: u64) -> Self {
        Self::new(level.config(seed))
    }

    /// Replace the evaluator. Panics while a search is running.
    pub fn with_evaluator<E: Evaluator<G> + 'static>(mut self, evaluator: E) -> Self {
        let driver = self
            .driver
            .take()
            .unwrap_or_else(|| panic!("robot is already thinking"));
        self.driver = Some(driver.with_evaluator(evaluator));
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Search settings, `None` while a search is running.
    #[must_use]
    pub fn config(&self) -> Option<&SearchConfig> {
        self.driver.as_ref().map(SearchDriver::config)
    }

    /// Search on the calling thread and return the chosen move.
    pub fn choose_move(&mut self, board: &Board<G>) -> MoveRecord {
        self.think(board).best_move
    }

    /// Search on the calling thread.
    pub fn think(&mut self, board: &Board<G>) -> SearchResult {
        let driver = self
            .driver
            .as_mut()
            .unwrap_or_else(|| panic!("robot is already thinking"));
        self.stop.reset();
        let result = driver.search(board);
        log_choice(board, &result);
        result
    }

    /// Start searching a clone of `board` in the background.
    pub fn start(&mut self, board: &Board<G>) {
        self.start_with_callback(board, |_| {});
    }

    /// Like `start`, and call `callback` on the worker thread when done.
    pub fn start_with_callback<F>(&mut self, board: &Board<G>, callback: F)
    where
        F: FnOnce(&SearchResult) + Send + 'static,
    {
        let mut driver = self
            .driver
            .take()
            .unwrap_or_else(|| panic!("robot is already thinking"));
        self.stop.reset();

        info!(
            player = %board.player(),
            move_number = board.move_number(),
            depth = driver.config().depth,
            "robot thinking"
        );

        let (sender, receiver) = bounded(1);
        let board = board.clone();
        let handle = thread::spawn(move || {
            let result = driver.search(&board);
            log_choice(&board, &result);
            callback(&result);
            // the controller may have been dropped
            let _ = sender.send((driver, result));
        });
        self.worker = Some(Worker { receiver, handle });
    }

    /// Result of the background search if it has finished.
    pub fn poll(&mut self) -> Option<SearchResult> {
        let worker = self.worker.as_ref()?;
        match worker.receiver.try_recv() {
            Ok(finished) => Some(self.collect(finished)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rethrow();
                None
            }
        }
    }

    /// Block until the background search finishes.
    ///
    /// `None` if no search was started.
    pub fn wait(&mut self) -> Option<SearchResult> {
        let worker = self.worker.as_ref()?;
        match worker.receiver.recv() {
            Ok(finished) => Some(self.collect(finished)),
            Err(_) => {
                self.rethrow();
                None
            }
        }
    }

    /// Ask the running search to return its best move so far.
    pub fn stop(&self) {
        if self.worker.is_some() {
            self.stop.stop();
        }
    }

    /// Stop and wait.
    pub fn interrupt(&mut self) -> Option<SearchResult> {
        self.stop();
        self.wait()
    }

    fn collect(&mut self, (driver, result): Finished<G>) -> SearchResult {
        if let Some(worker) = self.worker.take() {
            // the worker has sent its result and is about to exit
            let _ = worker.handle.join();
        }
        self.driver = Some(driver);
        result
    }

    /// The worker dropped its sender without a result: it panicked.
    fn rethrow(&mut self) {
        if let Some(worker) = self.worker.take() {
            if let Err(panic) = worker.handle.join() {
                std::panic::resume_unwind(panic);
            }
        }
    }
}

impl<G: GameRules> Drop for RobotController<G> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.stop.stop();
            let _ = worker.handle.join();
        }
    }
}

fn log_choice<G: GameRules>(board: &Board<G>, result: &SearchResult) {
    info!(
        player = %board.player(),
        best = %result.best_move,
        value = result.value,
        depth = result.depth,
        nodes = result.stats.nodes,
        nps = result.stats.nodes_per_second() as u64,
        tt_hit_rate = result.stats.tt_hit_rate(),
        fallback = result.fallback,
        reused_pv = result.reused_pv,
        "robot chose move"
    );
}
