use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Очередь отложенных проверок активации.
///
/// Проверки срабатывают строго в порядке назначения, каждая не раньше
/// своего срока. Очередь живёт на той же задаче, что и обработка событий,
/// поэтому проверка никогда не выполняется одновременно с событием.
#[derive(Debug, Default)]
pub struct DeferredChecks {
    deadlines: VecDeque<Instant>,
}

impl DeferredChecks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Назначить проверку через `delay` от текущего момента
    pub fn schedule(&mut self, delay: Duration) {
        self.deadlines.push_back(Instant::now() + delay);
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Ожидание срока ближайшей проверки; без проверок не завершается никогда.
    /// Для ветки `select!`: будущее не держит заимствование очереди.
    pub fn next_due(&self) -> impl Future<Output = ()> + 'static {
        let deadline = self.deadlines.front().copied();
        async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        }
    }

    /// Снять сработавшую проверку с головы очереди
    pub fn fire(&mut self) -> bool {
        self.deadlines.pop_front().is_some()
    }
}
