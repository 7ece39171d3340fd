//! Interactive console menu over a `CatalogService`.
//!
//! All user-facing text lives here. Lookup and validation failures are
//! printed and the loop continues; storage failures end the session.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::{error::AppError, models::NewBook, services::CatalogService};

const MENU: &str = "\
1. Add a book
2. Remove a book
3. Search books
4. Show all books
5. Change book status
6. Exit";

pub struct Menu<'a, R, W> {
    catalog: &'a mut CatalogService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(catalog: &'a mut CatalogService, input: R, output: W) -> Self {
        Self {
            catalog,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            let Some(choice) = self.prompt("Choose an action: ")? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.add()?,
                "2" => self.remove()?,
                "3" => self.search()?,
                "4" => self.show_all()?,
                "5" => self.change_status()?,
                "6" => {
                    writeln!(self.output, "Goodbye.")?;
                    false
                }
                _ => {
                    writeln!(
                        self.output,
                        "Invalid choice. Please pick an action from the list."
                    )?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn add(&mut self) -> Result<bool> {
        let Some(title) = self.prompt("Title: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Author: ")? else {
            return Ok(false);
        };
        let Some(year) = self.prompt_number("Year: ")? else {
            return Ok(false);
        };

        match self.catalog.add_book(NewBook::new(title, author, year)).map(|b| b.id()) {
            Ok(id) => writeln!(self.output, "Book added with id {}.", id)?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    fn remove(&mut self) -> Result<bool> {
        let Some(id) = self.prompt_number("Id of the book to remove: ")? else {
            return Ok(false);
        };

        match self.catalog.remove_book(id) {
            Ok(_) => writeln!(self.output, "Book removed.")?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    fn search(&mut self) -> Result<bool> {
        let Some(term) = self.prompt("Title, author or year to search for: ")? else {
            return Ok(false);
        };

        let results = self.catalog.search_books(&term);
        if results.is_empty() {
            writeln!(self.output, "No books found.")?;
        }
        for book in results {
            writeln!(self.output, "{}", book)?;
        }
        Ok(true)
    }

    fn show_all(&mut self) -> Result<bool> {
        let books = self.catalog.list_books();
        if books.is_empty() {
            writeln!(self.output, "No books in the library.")?;
        }
        for book in books {
            writeln!(self.output, "{}", book)?;
        }
        Ok(true)
    }

    fn change_status(&mut self) -> Result<bool> {
        let Some(id) = self.prompt_number("Id of the book: ")? else {
            return Ok(false);
        };
        let Some(status) = self.prompt("New status (\"available\" or \"checked-out\"): ")? else {
            return Ok(false);
        };

        match self.catalog.change_status(id, &status).map(|b| b.status()) {
            Ok(status) => writeln!(self.output, "Status changed to {}.", status)?,
            Err(e) => self.report(e)?,
        }
        Ok(true)
    }

    /// Print recoverable errors; hand fatal ones back to the caller
    fn report(&mut self, err: AppError) -> Result<()> {
        if err.is_fatal() {
            return Err(err.into());
        }
        writeln!(self.output, "{}.", err)?;
        Ok(())
    }

    /// Read one line without its line ending. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Ask until the answer parses as an integer
    fn prompt_number(&mut self, label: &str) -> Result<Option<i32>> {
        loop {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            match answer.trim().parse::<i32>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => writeln!(self.output, "Please enter a whole number.")?,
            }
        }
    }
}
