fn main() {
    paper_summarizer_lib::run()
}
