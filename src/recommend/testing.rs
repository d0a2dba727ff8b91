//! Scripted provider stubs for the pipeline tests. Each stub records the
//! queries it was called with so tests can assert on tier short-circuiting
//! and call counts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::providers::{
    BookProvider, CatalogBook, GenerativeProvider, MovieProvider, MovieRecord, MusicProvider,
    ProviderError, ProviderResult, Track,
};

/// Scripted reply for one stubbed call.
pub(crate) enum Scripted<T> {
    Reply(T),
    Fail,
}

fn stub_failure() -> ProviderError {
    ProviderError::Malformed("stub failure".to_string())
}

pub(crate) fn book(title: &str, author: Option<&str>) -> CatalogBook {
    CatalogBook {
        title: title.to_string(),
        author: author.map(str::to_string),
    }
}

pub(crate) fn track(name: &str, artist: Option<&str>) -> Track {
    Track {
        name: name.to_string(),
        artist: artist.map(str::to_string),
    }
}

pub(crate) struct StubMovies {
    record: Scripted<Option<MovieRecord>>,
    calls: Mutex<Vec<String>>,
}

impl StubMovies {
    pub(crate) fn found(record: MovieRecord) -> Self {
        Self {
            record: Scripted::Reply(Some(record)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn not_found() -> Self {
        Self {
            record: Scripted::Reply(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            record: Scripted::Fail,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieProvider for StubMovies {
    async fn lookup(&self, title: &str) -> ProviderResult<Option<MovieRecord>> {
        self.calls.lock().unwrap().push(title.to_string());
        match &self.record {
            Scripted::Reply(record) => Ok(record.clone()),
            Scripted::Fail => Err(stub_failure()),
        }
    }
}

#[derive(Default)]
pub(crate) struct StubBooks {
    search_script: HashMap<String, Scripted<Vec<CatalogBook>>>,
    subject_script: HashMap<String, Scripted<Vec<CatalogBook>>>,
    search_calls: Mutex<Vec<String>>,
    subject_calls: Mutex<Vec<String>>,
}

impl StubBooks {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn on_search(mut self, query: &str, reply: Scripted<Vec<CatalogBook>>) -> Self {
        self.search_script.insert(query.to_string(), reply);
        self
    }

    pub(crate) fn on_subject(mut self, subject: &str, reply: Scripted<Vec<CatalogBook>>) -> Self {
        self.subject_script.insert(subject.to_string(), reply);
        self
    }

    pub(crate) fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub(crate) fn subject_calls(&self) -> Vec<String> {
        self.subject_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookProvider for StubBooks {
    async fn search(&self, query: &str, _limit: usize) -> ProviderResult<Vec<CatalogBook>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        match self.search_script.get(query) {
            Some(Scripted::Reply(books)) => Ok(books.clone()),
            Some(Scripted::Fail) => Err(stub_failure()),
            None => Ok(Vec::new()),
        }
    }

    async fn browse_subject(
        &self,
        subject: &str,
        _limit: usize,
    ) -> ProviderResult<Vec<CatalogBook>> {
        self.subject_calls.lock().unwrap().push(subject.to_string());
        match self.subject_script.get(subject) {
            Some(Scripted::Reply(books)) => Ok(books.clone()),
            Some(Scripted::Fail) => Err(stub_failure()),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Default)]
pub(crate) struct StubMusic {
    script: HashMap<String, Scripted<Vec<Track>>>,
    calls: Mutex<Vec<String>>,
}

impl StubMusic {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn on_search(mut self, query: &str, reply: Scripted<Vec<Track>>) -> Self {
        self.script.insert(query.to_string(), reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicProvider for StubMusic {
    async fn search_tracks(&self, query: &str, _limit: usize) -> ProviderResult<Vec<Track>> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.script.get(query) {
            Some(Scripted::Reply(tracks)) => Ok(tracks.clone()),
            Some(Scripted::Fail) => Err(stub_failure()),
            None => Ok(Vec::new()),
        }
    }
}

pub(crate) struct StubTextGen {
    reply: Scripted<String>,
    calls: AtomicUsize,
}

impl StubTextGen {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Scripted::Reply(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            reply: Scripted::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeProvider for StubTextGen {
    async fn generate(&self, _prompt: &str) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Scripted::Reply(text) => Ok(text.clone()),
            Scripted::Fail => Err(stub_failure()),
        }
    }
}
