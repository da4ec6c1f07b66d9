use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use log::{ debug, info, warn };

use crate::ray::Ray4D;
use crate::world::{ World, WorldHit };

pub enum Message {
    /// Trace the ray at this index of the batch.
    Ray(usize),
    Terminate,
}

type Results = Arc<Mutex<Vec<Option<WorldHit>>>>;

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, world: Arc<World>, rays: Arc<Vec<Ray4D>>, results: Results,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>) -> Worker {

        let thread = thread::spawn(move || loop {
            // A poisoned or closed queue means the pool is gone.
            let message = match receiver.lock() {
                Ok(queue) => queue.recv(),
                Err(_) => break,
            };

            match message {
                Ok(Message::Ray(index)) => {
                    let hit = rays.get(index).and_then(|ray| world.nearest_hit(ray));
                    match results.lock() {
                        Ok(mut results) => results[index] = hit,
                        Err(_) => {
                            warn!("Worker {} dropped ray {}: results poisoned", id, index);
                            break;
                        },
                    }
                },

                Ok(Message::Terminate) | Err(_) => break,
            }
        });

        Worker { id, thread: Some(thread) }
    }
}

/// Fixed set of worker threads pulling ray indices off a shared queue.
///
/// Dropping the pool tells every worker to stop and waits for them, so all
/// queued rays are traced by the time the drop returns.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    /// `size` is raised to one if zero.
    pub fn new(size: usize, world: Arc<World>, rays: Arc<Vec<Ray4D>>,
        results: Results) -> ThreadPool {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(
                id,
                Arc::clone(&world),
                Arc::clone(&rays),
                Arc::clone(&results),
                Arc::clone(&receiver)
            ));
        }

        ThreadPool { workers, sender }
    }

    pub fn execute(&mut self, message: Message) {
        if self.sender.send(message).is_err() {
            warn!("All workers have stopped; message dropped");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            // Fails only once every worker is gone, which is fine here.
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!("Worker {} panicked", worker.id);
                }
            }
        }
    }
}

/// Nearest hit of every ray, in the order the rays were given.
pub fn trace_batch(world: Arc<World>, rays: Vec<Ray4D>, threads: usize)
    -> Vec<Option<WorldHit>> {
    let count = rays.len();
    let rays = Arc::new(rays);
    let results: Results = Arc::new(Mutex::new(vec![None; count]));

    debug!("Tracing {} rays using {} threads", count, threads.max(1));
    {
        let mut thread_pool = ThreadPool::new(
            threads, world, Arc::clone(&rays), Arc::clone(&results)
        );

        for index in 0..count {
            thread_pool.execute(Message::Ray(index));
        }
    }

    let hits = match results.lock() {
        Ok(results) => results.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    info!("Traced {} rays, {} hit", count, hits.iter().filter(|h| h.is_some()).count());
    hits
}

/* Tests */

#[cfg(test)]
use crate::shape::Shape;
#[cfg(test)]
use crate::tuple::Tuple4D;

#[cfg(test)]
fn fan(n: usize) -> Vec<Ray4D> {
    (0..n).map(|i| {
        let x = -2.0 + 4.0 * (i as f64) / (n as f64);
        Ray4D::new(Tuple4D::point(x, 0.0, -5.0), Tuple4D::vector(0.0, 0.0, 1.0))
    }).collect()
}

#[test]
fn batch_matches_sequential_tracing_in_order() {
    let mut world = World::empty();
    world.add_shape(Shape::sphere());
    let world = Arc::new(world);

    let rays = fan(64);
    let expected: Vec<_> = rays.iter().map(|r| world.nearest_hit(r)).collect();

    assert_eq!(trace_batch(Arc::clone(&world), rays, 4), expected);
}

#[test]
fn zero_threads_still_traces() {
    let mut world = World::empty();
    world.add_shape(Shape::sphere());

    let hits = trace_batch(Arc::new(world), fan(8), 0);

    assert_eq!(hits.len(), 8);
    assert!(hits.iter().any(|h| h.is_some()));
    assert!(hits[0].is_none());
}

#[test]
fn empty_batch() {
    assert!(trace_batch(Arc::new(World::empty()), Vec::new(), 2).is_empty());
}
