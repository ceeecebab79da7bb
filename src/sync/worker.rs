use std::{sync::atomic::Ordering, sync::mpsc, thread};

use crate::{Error, Result};

use super::THREAD_SEQ;

pub trait FnBox<T = ()> {
    fn run_task(self: Box<Self>) -> T;
}

impl<T, F: FnOnce() -> T> FnBox<T> for F {
    fn run_task(self: Box<Self>) -> T {
        (*self)()
    }
}

pub type Task<T = ()> = Box<dyn FnBox<T> + Send + 'static>;

pub enum Message<T = Task> {
    NewTask(T),
    Terminate,
}

/// Fire-and-forget task thread. Queued tasks drain in order; dropping the
/// worker finishes the queue before joining.
pub struct Worker {
    pub id: usize,
    thread: Option<thread::JoinHandle<()>>,
    sender: Option<mpsc::Sender<Message>>,
}

impl Worker {
    pub fn new(name: String) -> Self {
        let worker_id = THREAD_SEQ.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::channel();
        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || loop {
                let message: Message<Task> = match receiver.recv() {
                    Ok(message) => message,
                    Err(_) => break,
                };
                match message {
                    Message::NewTask(task) => {
                        task.run_task();
                    }
                    Message::Terminate => {
                        break;
                    }
                }
            })
            .unwrap_or_else(|err| panic!("Failed to spawn worker thread: {} with {}", name, err));

        Self {
            id: worker_id,
            thread: Some(thread),
            sender: Some(sender),
        }
    }

    pub fn send<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(sender) = &self.sender else {
            return Err(Error::SyncError(
                format!("worker {}: sender already taken", self.id).into(),
            ));
        };
        sender
            .send(Message::NewTask(Box::new(f)))
            .map_err(|err| Error::SyncError(err.to_string().into()))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        log::info!("Sending terminate message to worker {}", self.id);
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(Message::Terminate);
        }
        log::info!("Shutting down worker {}", self.id);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::Worker;

    #[test]
    fn drains_queued_tasks_before_join() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let worker = Worker::new("test_worker".into());
            for _ in 0..5 {
                let counter = Arc::clone(&counter);
                worker
                    .send(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
